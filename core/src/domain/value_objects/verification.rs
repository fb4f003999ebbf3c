//! Administrator decisions on verification documents.

use serde::{Deserialize, Serialize};

use crate::domain::entities::DocumentStatus;
use crate::errors::ValidationError;

/// Terminal decision an administrator can take on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationDecision {
    Verified,
    Rejected,
}

impl VerificationDecision {
    pub fn status(&self) -> DocumentStatus {
        match self {
            VerificationDecision::Verified => DocumentStatus::Verified,
            VerificationDecision::Rejected => DocumentStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

impl TryFrom<DocumentStatus> for VerificationDecision {
    type Error = ValidationError;

    fn try_from(status: DocumentStatus) -> Result<Self, Self::Error> {
        match status {
            DocumentStatus::Verified => Ok(VerificationDecision::Verified),
            DocumentStatus::Rejected => Ok(VerificationDecision::Rejected),
            DocumentStatus::Pending => Err(ValidationError::InvalidValue {
                field: "decision".to_string(),
                value: status.as_str().to_string(),
            }),
        }
    }
}

/// A request to decide one verification document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub document_id: String,
    pub admin_id: String,
    pub decision: VerificationDecision,
    pub rejection_reason: Option<String>,
}

impl VerificationRequest {
    pub fn verify(document_id: impl Into<String>, admin_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            admin_id: admin_id.into(),
            decision: VerificationDecision::Verified,
            rejection_reason: None,
        }
    }

    pub fn reject(document_id: impl Into<String>, admin_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            admin_id: admin_id.into(),
            decision: VerificationDecision::Rejected,
            rejection_reason: Some(reason.into()),
        }
    }

    /// Check identifiers are present and a rejection carries a reason.
    ///
    /// Identifiers and the reason are trimmed; a reason supplied with an
    /// approval is dropped.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let document_id = required("document_id", &self.document_id)?;
        let admin_id = required("admin_id", &self.admin_id)?;

        let reason = self
            .rejection_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let rejection_reason = match self.decision {
            VerificationDecision::Rejected => Some(reason.ok_or_else(|| ValidationError::required("rejection_reason"))?),
            VerificationDecision::Verified => None,
        };

        Ok(Self {
            document_id,
            admin_id,
            decision: self.decision,
            rejection_reason,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed.to_string())
}
