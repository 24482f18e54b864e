use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, projects, users, util::normalize_name_key};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Unknown users and non-superusers are both rejected as forbidden.
    pub(super) async fn require_superuser(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .filter(|user| user.is_superuser)
            .ok_or_else(|| EngineError::Forbidden("superuser required".to_string()))?;
        Ok(user)
    }

    pub(super) async fn require_project(
        &self,
        db: &DatabaseTransaction,
        project_id: Uuid,
    ) -> ResultEngine<projects::Model> {
        projects::Entity::find_by_id(project_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("charity_project not exists".to_string()))
    }

    /// Check that no other project already uses a name with the same key.
    pub(super) async fn require_unique_project_name(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = projects::Entity::find()
            .filter(projects::Column::NameNorm.eq(normalize_name_key(name)));
        if let Some(id) = except {
            query = query.filter(projects::Column::Id.ne(id.to_string()));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
