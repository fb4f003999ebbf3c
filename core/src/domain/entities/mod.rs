//! Domain entities representing the marketplace records.

pub mod audit_log;
pub mod listing;
pub mod notification;
pub mod property;
pub mod saved_listing;
pub mod user;
pub mod verification_document;

#[cfg(test)]
mod tests;

pub use audit_log::{AuditLog, NewAuditLog, ACTION_DOCUMENT_REJECTED, ACTION_DOCUMENT_VERIFIED};
pub use listing::{Listing, ListingStatus, ListingStatusUpdate, NewListing};
pub use notification::{NewNotification, Notification, NotificationType};
pub use property::{
    Location, NewProperty, PriceHistoryEntry, Property, PropertyType, PropertyUpdate,
    DEFAULT_PRICE_CHANGE_REASON, INITIAL_PRICE_REASON,
};
pub use saved_listing::SavedListing;
pub use user::{NewUser, User, UserRole, UserUpdate, VerificationStatus};
pub use verification_document::{
    DocumentStatus, DocumentType, NewVerificationDocument, VerificationDocument,
};

use crate::store::Record;

macro_rules! record {
    ($ty:ty, $collection:literal) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn assign_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

record!(User, "users");
record!(Property, "properties");
record!(Listing, "listings");
record!(VerificationDocument, "verification_documents");
record!(SavedListing, "saved_listings");
record!(Notification, "notifications");
record!(AuditLog, "audit_logs");
