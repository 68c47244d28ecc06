//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a command is malformed (missing account,
//!   zero-amount transfer, transfer to the same account, unknown category).
//! - [`KeyNotFound`] thrown when a referenced account or transaction is absent.
//! - [`Database`] thrown when the backing store fails; the atomic scope
//!   guarantees nothing was written.
//! - [`SeedInProgress`] thrown when a second seeding runs concurrently.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
//!  [`SeedInProgress`]: EngineError::SeedInProgress
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Seeding already in progress")]
    SeedInProgress,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Whether the failure came from another writer holding the database.
    ///
    /// Nothing was committed in that case, so the same command can be retried.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Database(err) => {
                let message = err.to_string().to_lowercase();
                message.contains("database is locked") || message.contains("busy")
            }
            _ => false,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::SeedInProgress, Self::SeedInProgress) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
