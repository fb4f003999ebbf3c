//! # Estate Core
//!
//! Domain layer of the estate marketplace data-access stack: typed records,
//! the error taxonomy, the document-store contract with its in-memory
//! implementation, repositories and the verification coordinator.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::{DomainError, DomainResult, StoreError, StoreResult, ValidationError, VerificationError};
pub use repositories::{Analytics, Repositories};
pub use services::{OwnerUpdate, VerificationCoordinator, VerificationOutcome};
pub use store::{Collection, DocumentStore, Filter, InMemoryStore, Patch, Record, StoreTransaction};
