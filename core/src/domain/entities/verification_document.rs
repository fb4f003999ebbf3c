//! Verification documents uploaded by users and decided by administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::domain::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Proof of identity; verifying one verifies its owner
    IdentityProof,
    PropertyOwnership,
    BusinessLicense,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdentityProof => "identity_proof",
            DocumentType::PropertyOwnership => "property_ownership",
            DocumentType::BusinessLicense => "business_license",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DocumentStatus::Pending)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document submitted for verification.
///
/// Once `status` leaves `pending`, `verified_at` and `verified_by` are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub owner_id: String,

    pub document_type: DocumentType,

    pub document_url: String,

    #[serde(default)]
    pub status: DocumentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,

    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVerificationDocument {
    #[validate(length(min = 1))]
    pub owner_id: String,

    pub document_type: DocumentType,

    #[validate(url)]
    pub document_url: String,
}

impl NewVerificationDocument {
    pub fn new(owner_id: impl Into<String>, document_type: DocumentType, document_url: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            document_type,
            document_url: document_url.into(),
        }
    }
}

impl VerificationDocument {
    pub fn from_new(input: NewVerificationDocument) -> Self {
        Self {
            id: String::new(),
            owner_id: input.owner_id,
            document_type: input.document_type,
            document_url: input.document_url,
            status: DocumentStatus::Pending,
            verified_by: None,
            verified_at: None,
            rejection_reason: None,
            created_at: timestamp::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DocumentStatus::Pending
    }

    pub fn is_identity_proof(&self) -> bool {
        self.document_type == DocumentType::IdentityProof
    }
}
