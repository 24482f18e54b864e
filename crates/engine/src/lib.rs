//! Charity fund engine.
//!
//! Holds the domain types ([`CharityProject`], [`Donation`]), the allocation
//! pass that spreads free money between them ([`investment`]) and the
//! database-backed operations exposed through [`Engine`].

pub use commands::{DonationNewCmd, ProjectNewCmd, ProjectUpdateCmd};
pub use donations::Donation;
pub use error::EngineError;
pub use investment::{Funding, Investable, allocate, allocate_at};
pub use ops::{Engine, EngineBuilder};
pub use projects::{CharityProject, PROJECT_NAME_MAX_LEN};
pub use users::User;

mod commands;
mod donations;
mod error;
pub mod investment;
mod ops;
mod projects;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
