//! Classification of driver errors into [`StoreError`].

use estate_core::errors::StoreError;
use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Server code for a write conflict inside a transaction
pub const WRITE_CONFLICT_CODE: i32 = 112;

/// Label the server attaches to errors after which the whole transaction may
/// be retried
pub const TRANSIENT_TRANSACTION_LABEL: &str = "TransientTransactionError";

/// Map a driver error raised while working on `collection`
pub fn map_error(err: Error, collection: &str) -> StoreError {
    let transient = err.contains_label(TRANSIENT_TRANSACTION_LABEL);
    let message = err.to_string();

    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } => StoreError::Timeout { message },
        ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Connection { message },
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => StoreError::Serialization { message },
        ErrorKind::Command(command) => classify(Some(command.code), transient, collection, message),
        ErrorKind::Write(WriteFailure::WriteError(write)) => classify(Some(write.code), transient, collection, message),
        _ => classify(None, transient, collection, message),
    }
}

/// Map a server error code and transaction label onto a store error
pub fn classify(code: Option<i32>, transient: bool, collection: &str, message: String) -> StoreError {
    match code {
        Some(DUPLICATE_KEY_CODE) => StoreError::DuplicateKey {
            collection: collection.to_string(),
            message,
        },
        Some(WRITE_CONFLICT_CODE) => StoreError::WriteConflict {
            collection: collection.to_string(),
            id: String::from("unknown"),
        },
        _ if transient => StoreError::WriteConflict {
            collection: collection.to_string(),
            id: String::from("unknown"),
        },
        _ => StoreError::Backend { message },
    }
}
