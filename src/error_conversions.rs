//! Error conversion glue between the domain, storage and service layers.
//!
//! The domain layer must not depend on service error types, so conversions
//! that cross the boundary live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

/// Missing rows surface as 404s and constraint hits as conflicts; anything
/// else stays a storage failure.
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound(err.to_string()),
            RepositoryError::Duplicate(_) | RepositoryError::BrokenReference(_) => {
                ServiceError::Conflict(err.to_string())
            }
            other => ServiceError::Repository(other),
        }
    }
}
