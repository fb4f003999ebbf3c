//! Verification coordinator.
//!
//! Decides verification documents and keeps the owning user's verification
//! status consistent with them. Every decision runs as a single store
//! transaction covering:
//! - the guarded status change of the document
//! - promotion of the owner when an identity proof is approved
//! - the audit log entry for the decision

mod coordinator;
mod types;


pub use coordinator::VerificationCoordinator;
pub use types::{OwnerUpdate, VerificationOutcome};
