//! The module contains `Donation` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    investment::{Funding, Investable},
};

/// Money given by a user.
///
/// The donation is spread over open projects until all of it is invested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    /// Username of the donor.
    pub user_id: String,
    pub comment: Option<String>,
    pub funding: Funding,
}

impl Donation {
    pub fn new(
        user_id: String,
        comment: Option<String>,
        full_amount: i64,
        create_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            comment,
            funding: Funding::new(full_amount, create_date)?,
        })
    }
}

impl Investable for Donation {
    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub comment: Option<String>,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub create_date: DateTimeUtc,
    pub close_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Donation> for ActiveModel {
    fn from(donation: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(donation.id.to_string()),
            user_id: ActiveValue::Set(donation.user_id.clone()),
            comment: ActiveValue::Set(donation.comment.clone()),
            full_amount: ActiveValue::Set(donation.funding.full_amount),
            invested_amount: ActiveValue::Set(donation.funding.invested_amount),
            fully_invested: ActiveValue::Set(donation.funding.fully_invested),
            create_date: ActiveValue::Set(donation.funding.create_date),
            close_date: ActiveValue::Set(donation.funding.close_date),
        }
    }
}

/// Only the columns an allocation pass can change.
pub(crate) fn funding_update(donation: &Donation) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(donation.id.to_string()),
        invested_amount: ActiveValue::Set(donation.funding.invested_amount),
        fully_invested: ActiveValue::Set(donation.funding.fully_invested),
        close_date: ActiveValue::Set(donation.funding.close_date),
        ..Default::default()
    }
}

impl TryFrom<Model> for Donation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "donation")?,
            user_id: model.user_id,
            comment: model.comment,
            funding: Funding {
                full_amount: model.full_amount,
                invested_amount: model.invested_amount,
                fully_invested: model.fully_invested,
                create_date: model.create_date,
                close_date: model.close_date,
            },
        })
    }
}
