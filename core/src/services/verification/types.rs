//! Types for verification coordinator results

use crate::domain::entities::VerificationDocument;

/// What happened to the document owner's verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerUpdate {
    /// The owner was moved to `verified`
    Promoted,
    /// The owner was already `verified`
    AlreadyVerified,
    /// The owner record does not exist; the document decision still stands
    OwnerMissing,
    /// The decision does not affect the owner (rejection, or not an
    /// identity proof)
    NotApplicable,
}

/// Result of a committed verification decision
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// The document as stored after the decision
    pub document: VerificationDocument,
    pub owner_update: OwnerUpdate,
    /// The same decision had already been recorded; nothing was rewritten
    pub already_applied: bool,
    /// Audit entry written for this decision
    pub audit_log_id: Option<String>,
}
