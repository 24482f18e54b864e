//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ProjectClosed`] thrown when a fully invested project is edited or
//!   deleted.
//! - [`ProjectFunded`] thrown when a project that already received money is
//!   deleted.
//!
//! Invariant violations inside the allocation pass are not represented here:
//! they are programming errors and abort (see [`investment`]).
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ProjectClosed`]: EngineError::ProjectClosed
//!  [`ProjectFunded`]: EngineError::ProjectFunded
//!  [`investment`]: crate::investment
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Project closed: {0}")]
    ProjectClosed(String),
    #[error("Project funded: {0}")]
    ProjectFunded(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidPassword(a), Self::InvalidPassword(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ProjectClosed(a), Self::ProjectClosed(b)) => a == b,
            (Self::ProjectFunded(a), Self::ProjectFunded(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
