use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{Donation, DonationNewCmd, ResultEngine, donations, investment::allocate_at, projects};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Record a donation and spread it over the open projects.
    pub async fn create_donation(
        &self,
        cmd: DonationNewCmd,
        user_id: &str,
    ) -> ResultEngine<Donation> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let comment = normalize_optional_text(cmd.comment.as_deref());
            let mut donation = Donation::new(user.username, comment, cmd.full_amount, now)?;

            let mut sources = self.open_projects(&db_tx).await?;
            let touched = allocate_at(&mut donation, &mut sources, now);
            for project in touched.iter() {
                projects::funding_update(project).update(&db_tx).await?;
            }
            tracing::debug!(
                donation = %donation.id,
                projects = touched.len(),
                invested = donation.funding.invested_amount,
                "allocated new donation to open projects"
            );

            donations::ActiveModel::from(&donation).insert(&db_tx).await?;
            Ok(donation)
        })
    }

    /// Every donation, oldest first.
    ///
    /// Authorization: superuser only.
    pub async fn list_donations(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            let models = donations::Entity::find()
                .order_by_asc(donations::Column::CreateDate)
                .order_by_asc(donations::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Donation::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Donations made by `user_id`, oldest first.
    pub async fn user_donations(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let models = donations::Entity::find()
                .filter(donations::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(donations::Column::CreateDate)
                .order_by_asc(donations::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Donation::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Open donations in allocation order.
    pub(super) async fn open_donations(
        &self,
        db: &DatabaseTransaction,
    ) -> ResultEngine<Vec<Donation>> {
        donations::Entity::find()
            .filter(donations::Column::FullyInvested.eq(false))
            .order_by_asc(donations::Column::CreateDate)
            .order_by_asc(donations::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Donation::try_from)
            .collect()
    }
}
