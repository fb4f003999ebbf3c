//! Error taxonomy for the record store, input validation and the
//! verification workflow.

use thiserror::Error;

/// Errors raised by a document store implementation.
///
/// Backends map their client errors onto these variants so callers never
/// depend on a particular driver's error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate key in {collection}: {message}")]
    DuplicateKey { collection: String, message: String },

    #[error("Store connection failed: {message}")]
    Connection { message: String },

    #[error("Store operation timed out: {message}")]
    Timeout { message: String },

    #[error("Write conflict in {collection} on {id}")]
    WriteConflict { collection: String, id: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("Invalid transaction state: {message}")]
    TransactionState { message: String },

    #[error("Store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn serialization(message: impl Into<String>) -> Self {
        StoreError::Serialization {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }

    /// Whether retrying the whole unit of work may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::WriteConflict { .. } | StoreError::Timeout { .. } | StoreError::Connection { .. }
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange { field: String, min: String, max: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredField { field: field.into() }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let field = field.to_string();
                match errs.first().map(|e| e.code.as_ref()) {
                    Some("required") | Some("length") => ValidationError::RequiredField { field },
                    Some("range") => ValidationError::OutOfRange {
                        field,
                        min: errs[0].params.get("min").map(|v| v.to_string()).unwrap_or_default(),
                        max: errs[0].params.get("max").map(|v| v.to_string()).unwrap_or_default(),
                    },
                    _ => ValidationError::InvalidFormat { field },
                }
            }
            None => ValidationError::InvalidFormat {
                field: String::from("unknown"),
            },
        }
    }
}

/// Errors returned by the verification coordinator
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Verification document not found: {document_id}")]
    NotFound { document_id: String },

    #[error("Verification document {document_id} was already decided as {current_status}")]
    Conflict {
        document_id: String,
        current_status: String,
    },

    #[error("Verification transaction failed: {source}")]
    TransactionFailed {
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<StoreError> for VerificationError {
    fn from(source: StoreError) -> Self {
        VerificationError::TransactionFailed { source }
    }
}
