//! Command structs for engine operations.
//!
//! These types group parameters for write operations (project
//! creation/update, donation creation), keeping call sites readable and
//! avoiding long argument lists.

/// Create a charity project.
#[derive(Clone, Debug)]
pub struct ProjectNewCmd {
    pub name: String,
    pub description: String,
    pub full_amount: i64,
}

impl ProjectNewCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, full_amount: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            full_amount,
        }
    }
}

/// Partial update of an open charity project.
///
/// `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdateCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub full_amount: Option<i64>,
}

impl ProjectUpdateCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn full_amount(mut self, full_amount: i64) -> Self {
        self.full_amount = Some(full_amount);
        self
    }

    /// Returns `true` if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.full_amount.is_none()
    }
}

/// Create a donation.
#[derive(Clone, Debug)]
pub struct DonationNewCmd {
    pub full_amount: i64,
    pub comment: Option<String>,
}

impl DonationNewCmd {
    #[must_use]
    pub fn new(full_amount: i64) -> Self {
        Self {
            full_amount,
            comment: None,
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
