//! Typed records and their document representation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

use super::query::Document;

/// Field holding the record identifier in every collection
pub const ID_FIELD: &str = "_id";

/// A typed record stored in a named collection.
///
/// The identifier is serialized under [`ID_FIELD`]. Records created without
/// an identifier get one assigned by the store on insert.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection holding this record type
    const COLLECTION: &'static str;

    /// Record identifier (empty until assigned by the store)
    fn id(&self) -> &str;

    /// Store the identifier assigned on insert
    fn assign_id(&mut self, id: String);
}

/// Serialize a record into a document
pub fn to_document<R: Serialize>(record: &R) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::serialization(format!(
            "record must serialize to an object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Deserialize a document into a record
pub fn from_document<R: DeserializeOwned>(document: Document) -> StoreResult<R> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Extract the document identifier, generating one when absent
pub fn ensure_id(document: &mut Document) -> StoreResult<String> {
    let existing = match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => None,
        Some(_) => return Err(StoreError::serialization("_id must be a string")),
    };
    Ok(existing.unwrap_or_else(|| {
        let id = Uuid::new_v4().to_string();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        id
    }))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
