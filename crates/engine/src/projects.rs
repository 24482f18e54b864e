//! The module contains `CharityProject` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    investment::{Funding, Investable},
};

/// Max length of a project name, in characters.
pub const PROJECT_NAME_MAX_LEN: usize = 100;

/// A fundraising project.
///
/// The project collects donations until `funding.full_amount` is reached.
/// Once closed it can no longer be edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharityProject {
    /// Stable identifier, generated once at creation.
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub funding: Funding,
}

impl CharityProject {
    pub fn new(
        name: String,
        description: String,
        full_amount: i64,
        create_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            funding: Funding::new(full_amount, create_date)?,
        })
    }

    /// Time elapsed between creation and closing, if closed.
    pub fn collection_time(&self) -> Option<chrono::Duration> {
        self.funding
            .close_date
            .map(|close_date| close_date - self.funding.create_date)
    }
}

impl Investable for CharityProject {
    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "charity_projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub description: String,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub create_date: DateTimeUtc,
    pub close_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CharityProject> for ActiveModel {
    fn from(project: &CharityProject) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            name_norm: ActiveValue::Set(crate::util::normalize_name_key(&project.name)),
            description: ActiveValue::Set(project.description.clone()),
            full_amount: ActiveValue::Set(project.funding.full_amount),
            invested_amount: ActiveValue::Set(project.funding.invested_amount),
            fully_invested: ActiveValue::Set(project.funding.fully_invested),
            create_date: ActiveValue::Set(project.funding.create_date),
            close_date: ActiveValue::Set(project.funding.close_date),
        }
    }
}

/// Only the columns an allocation pass can change.
pub(crate) fn funding_update(project: &CharityProject) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(project.id.to_string()),
        invested_amount: ActiveValue::Set(project.funding.invested_amount),
        fully_invested: ActiveValue::Set(project.funding.fully_invested),
        close_date: ActiveValue::Set(project.funding.close_date),
        ..Default::default()
    }
}

impl TryFrom<Model> for CharityProject {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "project")?,
            name: model.name,
            description: model.description,
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
