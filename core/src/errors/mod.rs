//! Domain-specific error types and error handling.

mod types;


pub use types::{StoreError, StoreResult, ValidationError, VerificationError};

use thiserror::Error;

/// Core domain errors returned by repositories and services
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Shorthand for a missing record of the given kind
    pub fn not_found(kind: &str, id: &str) -> Self {
        DomainError::NotFound {
            resource: format!("{} {}", kind, id),
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationErr(ValidationError::from(errors))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
