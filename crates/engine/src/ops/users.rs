use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, users};

use super::{Engine, normalize_required_text, with_tx};

const PASSWORD_MIN_LEN: usize = 3;

fn validate_password(username: &str, password: &str) -> ResultEngine<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(EngineError::InvalidPassword(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    if password.contains(username) {
        return Err(EngineError::InvalidPassword(
            "password must not contain the username".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        validate_password(&username, password)?;
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username),
                password: ActiveValue::Set(password.to_string()),
                is_superuser: ActiveValue::Set(is_superuser),
            }
            .insert(&db_tx)
            .await?;
            Ok(User::from(model))
        })
    }

    /// Create `username` as a superuser, or promote it if it already exists.
    ///
    /// The password of an existing user is left unchanged.
    pub async fn ensure_superuser(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        let existing = with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?;
            match model {
                None => Ok::<_, EngineError>(None),
                Some(model) if model.is_superuser => Ok(Some(User::from(model))),
                Some(model) => {
                    let mut active: users::ActiveModel = model.into();
                    active.is_superuser = ActiveValue::Set(true);
                    let model = active.update(&db_tx).await?;
                    tracing::info!(username = %model.username, "promoted user to superuser");
                    Ok(Some(User::from(model)))
                }
            }
        })?;

        match existing {
            Some(user) => Ok(user),
            None => self.create_user(&username, password, true).await,
        }
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            Ok(User::from(model))
        })
    }

    /// The user matching both credentials, if any.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?;
            Ok::<_, EngineError>(
                model
                    .filter(|model| model.password == password)
                    .map(User::from),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rules() {
        assert!(validate_password("alice", "s3cret").is_ok());
        assert!(matches!(
            validate_password("alice", "ab"),
            Err(EngineError::InvalidPassword(_))
        ));
        assert!(matches!(
            validate_password("alice", "xxalicexx"),
            Err(EngineError::InvalidPassword(_))
        ));
    }
}
