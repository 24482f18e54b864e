use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    CharityProject, EngineError, ProjectNewCmd, ProjectUpdateCmd, ResultEngine, donations,
    investment::{allocate_at, ensure_positive_amount},
    projects,
};

use super::{Engine, normalize_project_name, normalize_required_text, with_tx};

impl Engine {
    /// All projects, oldest first.
    pub async fn list_projects(&self) -> ResultEngine<Vec<CharityProject>> {
        with_tx!(self, |db_tx| {
            let models = projects::Entity::find()
                .order_by_asc(projects::Column::CreateDate)
                .order_by_asc(projects::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(CharityProject::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn project(&self, project_id: Uuid) -> ResultEngine<CharityProject> {
        with_tx!(self, |db_tx| {
            let model = self.require_project(&db_tx, project_id).await?;
            CharityProject::try_from(model)
        })
    }

    /// Create a project and immediately fund it from the open donations.
    ///
    /// Authorization: superuser only.
    pub async fn create_project(
        &self,
        cmd: ProjectNewCmd,
        user_id: &str,
    ) -> ResultEngine<CharityProject> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;

            let name = normalize_project_name(&cmd.name)?;
            let description = normalize_required_text(&cmd.description, "description")?;
            let mut project = CharityProject::new(name, description, cmd.full_amount, now)?;
            self.require_unique_project_name(&db_tx, &project.name, None)
                .await?;

            let mut sources = self.open_donations(&db_tx).await?;
            let touched = allocate_at(&mut project, &mut sources, now);
            for donation in touched.iter() {
                donations::funding_update(donation).update(&db_tx).await?;
            }
            tracing::debug!(
                project = %project.id,
                donations = touched.len(),
                invested = project.funding.invested_amount,
                "allocated open donations to new project"
            );

            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            Ok(project)
        })
    }

    /// Edit an open project. Money is not re-allocated.
    ///
    /// Lowering `full_amount` down to the invested amount closes the project.
    /// An empty command writes nothing and returns the stored project.
    ///
    /// Authorization: superuser only.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        cmd: ProjectUpdateCmd,
        user_id: &str,
    ) -> ResultEngine<CharityProject> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            let model = self.require_project(&db_tx, project_id).await?;
            let mut project = CharityProject::try_from(model)?;
            if !project.funding.is_open() {
                return Err(EngineError::ProjectClosed(
                    "a closed project cannot be edited".to_string(),
                ));
            }

            if let Some(name) = cmd.name.as_deref() {
                let name = normalize_project_name(name)?;
                self.require_unique_project_name(&db_tx, &name, Some(project.id))
                    .await?;
                project.name = name;
            }
            if let Some(description) = cmd.description.as_deref() {
                project.description = normalize_required_text(description, "description")?;
            }
            if let Some(full_amount) = cmd.full_amount {
                ensure_positive_amount(full_amount)?;
                let invested = project.funding.invested_amount;
                if full_amount < invested {
                    return Err(EngineError::InvalidAmount(format!(
                        "full_amount must not be less than the invested amount ({invested})"
                    )));
                }
                project.funding.full_amount = full_amount;
                if full_amount == invested {
                    project.funding.mark_fully_invested(now);
                }
            }

            if !cmd.is_empty() {
                projects::ActiveModel::from(&project).update(&db_tx).await?;
            }
            Ok(project)
        })
    }

    /// Delete a project that never received money.
    ///
    /// Authorization: superuser only.
    pub async fn delete_project(
        &self,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<CharityProject> {
        with_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            let model = self.require_project(&db_tx, project_id).await?;
            let project = CharityProject::try_from(model)?;
            if project.funding.invested_amount != 0 {
                return Err(EngineError::ProjectFunded(
                    "a project that received donations cannot be deleted".to_string(),
                ));
            }
            if !project.funding.is_open() {
                return Err(EngineError::ProjectClosed(
                    "a closed project cannot be deleted".to_string(),
                ));
            }

            projects::Entity::delete_by_id(project.id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(project)
        })
    }

    /// Closed projects, fastest to collect first.
    pub async fn projects_by_completion_rate(&self) -> ResultEngine<Vec<CharityProject>> {
        with_tx!(self, |db_tx| {
            let models = projects::Entity::find()
                .filter(projects::Column::FullyInvested.eq(true))
                .all(&db_tx)
                .await?;
            let mut closed = models
                .into_iter()
                .map(CharityProject::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            closed.sort_by_key(CharityProject::collection_time);
            Ok(closed)
        })
    }

    /// Open projects in allocation order.
    pub(super) async fn open_projects(
        &self,
        db: &DatabaseTransaction,
    ) -> ResultEngine<Vec<CharityProject>> {
        projects::Entity::find()
            .filter(projects::Column::FullyInvested.eq(false))
            .order_by_asc(projects::Column::CreateDate)
            .order_by_asc(projects::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(CharityProject::try_from)
            .collect()
    }
}
