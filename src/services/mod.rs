//! Business workflows behind the HTTP routes.
//!
//! Services are generic over the repository traits they need so they can be
//! exercised with the mock repository.

use thiserror::Error;

use crate::domain::document::DocumentError;
use crate::domain::list::ListQueryError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod assistant;
pub mod bulk;
pub mod contacts;
pub mod documents;
pub mod list;
pub mod meta;
#[cfg(all(test, feature = "test-mocks"))]
mod test_support;
pub mod validation;
pub mod views;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not enough permissions")]
    Unauthorized,

    /// The user may not touch this particular record.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Form(String),

    /// Input failed a business rule; the message is shown to the caller.
    #[error("{0}")]
    Validation(String),

    /// The operation would break a reference or uniqueness constraint.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DocumentError> for ServiceError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::UnknownDocType(_) => ServiceError::NotFound(err.to_string()),
            _ => ServiceError::Validation(err.to_string()),
        }
    }
}

impl From<ListQueryError> for ServiceError {
    fn from(err: ListQueryError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Result of a write that may carry non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct WithWarnings<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> WithWarnings<T> {
    pub fn new(value: T, warnings: Vec<String>) -> Self {
        Self { value, warnings }
    }
}
