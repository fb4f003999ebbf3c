//! Business services containing cross-record workflows.

pub mod verification;

pub use verification::{OwnerUpdate, VerificationCoordinator, VerificationOutcome};
