//! Repositories over the shared document store.
//!
//! Each repository wraps a typed [`Collection`](crate::store::Collection) and
//! owns the create/read/update/delete rules of one record type. All of them
//! share the injected `Arc<dyn DocumentStore>` handle.

pub mod analytics;
pub mod audit_log;
pub mod listing;
pub mod notification;
pub mod property;
pub mod saved_listing;
pub mod user;
pub mod verification_document;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use analytics::{Analytics, AnalyticsRepository};
pub use audit_log::{AuditLogQuery, AuditLogRepository};
pub use listing::ListingRepository;
pub use notification::NotificationRepository;
pub use property::PropertyRepository;
pub use saved_listing::SavedListingRepository;
pub use user::UserRepository;
pub use verification_document::VerificationDocumentRepository;

use crate::errors::{DomainError, StoreError};
use crate::store::DocumentStore;

/// Default cap for list operations
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Every repository, built over one store handle
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub properties: PropertyRepository,
    pub listings: ListingRepository,
    pub verification_documents: VerificationDocumentRepository,
    pub saved_listings: SavedListingRepository,
    pub notifications: NotificationRepository,
    pub audit_logs: AuditLogRepository,
    pub analytics: AnalyticsRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: UserRepository::new(Arc::clone(&store)),
            properties: PropertyRepository::new(Arc::clone(&store)),
            listings: ListingRepository::new(Arc::clone(&store)),
            verification_documents: VerificationDocumentRepository::new(Arc::clone(&store)),
            saved_listings: SavedListingRepository::new(Arc::clone(&store)),
            notifications: NotificationRepository::new(Arc::clone(&store)),
            audit_logs: AuditLogRepository::new(Arc::clone(&store)),
            analytics: AnalyticsRepository::new(store),
        }
    }
}

/// Map a unique-index violation onto a domain conflict
pub(crate) fn conflict_on_duplicate(kind: &'static str, id: &str) -> impl FnOnce(StoreError) -> DomainError {
    let id = id.to_string();
    move |err| match err {
        StoreError::DuplicateKey { .. } => DomainError::Conflict {
            message: format!("{} {} already exists", kind, id),
        },
        other => DomainError::Store(other),
    }
}
