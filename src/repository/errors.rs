use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Failures surfaced by the contact store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    /// A unique column such as a saved view label already holds the value.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// A manager, representative or contact link points at a missing row.
    #[error("Broken reference: {0}")]
    BrokenReference(String),

    /// A stored row no longer satisfies a domain constraint.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => RepositoryError::Duplicate(message),
                    DatabaseErrorKind::ForeignKeyViolation => {
                        RepositoryError::BrokenReference(message)
                    }
                    _ => RepositoryError::Database(message),
                }
            }
            DieselError::DeserializationError(e) => RepositoryError::CorruptRow(e.to_string()),
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::Connection(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::Connection(err.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::CorruptRow(err.to_string())
    }
}
