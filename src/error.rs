//! Error types shared by the domain, storage and service layers.
//!
//! Absence of a record is never an error here: lookups return `Option` and
//! deletes return whether a row was removed.

use thiserror::Error;

/// One or more visit fields violated their constraints.
///
/// Carries every violated-rule message, not only the first, so a caller can
/// report all problems at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid visit data: {}", .errors.join(", "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}

/// Failures of the backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A store-level constraint (e.g. the category CHECK) rejected the row.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The store could not be reached or the query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be turned back into a record.
    #[error("could not decode stored row: {0}")]
    Decode(String),

    /// The configured backend could not be opened.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by [`crate::VisitService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Startup configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}
