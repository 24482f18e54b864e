//! Investment allocation.
//!
//! When a new project or a new donation is created, the free money on one side
//! is moved to the open entities on the other side, oldest first. The newly
//! created entity is the *target*, the open entities of the opposite kind are
//! the *sources*.
//!
//! Both [`CharityProject`] and [`Donation`] carry a [`Funding`] record and
//! expose it through [`Investable`], so the pass works on either direction.
//!
//! ## Preconditions
//!
//! The caller hands over an open target and the open sources ordered by
//! `create_date`. A closed entity among the sources, an amount out of bounds or
//! an unordered source list means the caller filtered wrongly: the pass panics
//! instead of returning an error.
//!
//! [`CharityProject`]: crate::CharityProject
//! [`Donation`]: crate::Donation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Amounts and lifecycle dates shared by projects and donations.
///
/// Amounts are integers in the fund currency. Invariants:
/// - `0 <= invested_amount <= full_amount`
/// - `fully_invested == (invested_amount == full_amount)`
/// - `close_date.is_some() == fully_invested`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub create_date: DateTime<Utc>,
    pub close_date: Option<DateTime<Utc>>,
}

impl Funding {
    /// Creates an open record with nothing invested.
    pub fn new(full_amount: i64, create_date: DateTime<Utc>) -> ResultEngine<Self> {
        ensure_positive_amount(full_amount)?;
        Ok(Self {
            full_amount,
            invested_amount: 0,
            fully_invested: false,
            create_date,
            close_date: None,
        })
    }

    /// Money still missing (projects) or still free (donations).
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.full_amount - self.invested_amount
    }

    /// Returns `true` while the record can still take part in a pass.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.fully_invested
    }

    fn invest(&mut self, volume: i64) {
        self.invested_amount += volume;
    }

    /// Closes the record. `close_date` is written only once.
    pub(crate) fn mark_fully_invested(&mut self, at: DateTime<Utc>) {
        self.fully_invested = true;
        if self.close_date.is_none() {
            self.close_date = Some(at);
        }
    }
}

pub(crate) fn ensure_positive_amount(full_amount: i64) -> ResultEngine<()> {
    if full_amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "full_amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Anything that takes part in an allocation pass.
pub trait Investable {
    fn funding(&self) -> &Funding;

    fn funding_mut(&mut self) -> &mut Funding;
}

impl Investable for Funding {
    fn funding(&self) -> &Funding {
        self
    }

    fn funding_mut(&mut self) -> &mut Funding {
        self
    }
}

/// Runs one allocation pass, closing entities at `Utc::now()`.
///
/// See [`allocate_at`].
pub fn allocate<'a, T, S>(target: &mut T, sources: &'a mut [S]) -> &'a mut [S]
where
    T: Investable + ?Sized,
    S: Investable,
{
    allocate_at(target, sources, Utc::now())
}

/// Runs one allocation pass and returns the sources that received a transfer.
///
/// Sources are visited in order. Each step moves
/// `min(target.remaining(), source.remaining())` and closes whichever side
/// reaches its `full_amount`, using `closed_at` as `close_date`. The pass stops
/// as soon as the target is closed, so the touched sources are always a prefix
/// of `sources`. A target that is already fully invested is left untouched and
/// the result is empty.
///
/// # Panics
///
/// Panics if the target or any source breaks the open-entity precondition, or
/// if `sources` is not ordered by `create_date`.
pub fn allocate_at<'a, T, S>(
    target: &mut T,
    sources: &'a mut [S],
    closed_at: DateTime<Utc>,
) -> &'a mut [S]
where
    T: Investable + ?Sized,
    S: Investable,
{
    let target = target.funding_mut();
    if target.fully_invested {
        return &mut sources[..0];
    }
    assert_open(target, "target");
    for source in sources.iter() {
        assert_open(source.funding(), "source");
    }
    assert!(
        sources
            .windows(2)
            .all(|pair| pair[0].funding().create_date <= pair[1].funding().create_date),
        "sources must be ordered by create_date"
    );

    let mut touched = 0;
    for source in sources.iter_mut() {
        let source = source.funding_mut();
        let volume = target.remaining().min(source.remaining());
        for entity in [&mut *target, &mut *source] {
            entity.invest(volume);
            if entity.invested_amount == entity.full_amount {
                entity.mark_fully_invested(closed_at);
            }
        }
        touched += 1;
        if target.fully_invested {
            break;
        }
    }

    &mut sources[..touched]
}

fn assert_open(funding: &Funding, label: &str) {
    assert!(
        !funding.fully_invested && funding.close_date.is_none(),
        "{label} is closed: {funding:?}"
    );
    assert!(
        funding.invested_amount >= 0 && funding.invested_amount < funding.full_amount,
        "{label} has no remaining capacity: {funding:?}"
    );
}
