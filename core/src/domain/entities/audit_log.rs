//! Append-only audit trail of administrative and account actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::timestamp;

/// Action recorded when a verification document is approved
pub const ACTION_DOCUMENT_VERIFIED: &str = "verification_document.verified";

/// Action recorded when a verification document is rejected
pub const ACTION_DOCUMENT_REJECTED: &str = "verification_document.rejected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Acting user, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewAuditLog {
    #[validate(length(min = 1))]
    pub user_id: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub action: String,

    pub resource_type: Option<String>,

    pub resource_id: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl NewAuditLog {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn on(mut self, resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl AuditLog {
    pub fn from_new(input: NewAuditLog) -> Self {
        Self {
            id: String::new(),
            user_id: input.user_id,
            action: input.action,
            resource_type: input.resource_type,
            resource_id: input.resource_id,
            metadata: input.metadata,
            timestamp: timestamp::now(),
        }
    }
}
