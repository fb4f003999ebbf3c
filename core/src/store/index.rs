//! Index specifications and the marketplace index catalogue.

use crate::domain::entities::{
    AuditLog, Listing, Notification, Property, SavedListing, User, VerificationDocument,
};

use super::record::{Record, ID_FIELD};

/// A single index key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey {
    Ascending(&'static str),
    Descending(&'static str),
    /// Full-text index on a string field
    Text(&'static str),
    /// Spherical geo index on a GeoJSON point field
    Geo2dSphere(&'static str),
}

impl IndexKey {
    pub fn field(&self) -> &'static str {
        match self {
            IndexKey::Ascending(f) | IndexKey::Descending(f) | IndexKey::Text(f) | IndexKey::Geo2dSphere(f) => f,
        }
    }
}

/// Index definition for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: Vec<IndexKey>,
    pub unique: bool,
}

impl IndexSpec {
    pub fn new(collection: &'static str, keys: Vec<IndexKey>) -> Self {
        Self {
            collection,
            keys,
            unique: false,
        }
    }

    pub fn ascending(collection: &'static str, field: &'static str) -> Self {
        Self::new(collection, vec![IndexKey::Ascending(field)])
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Deterministic index name, `field_direction` pairs joined by `_`
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|key| match key {
                IndexKey::Ascending(f) => format!("{}_1", f),
                IndexKey::Descending(f) => format!("{}_-1", f),
                IndexKey::Text(f) => format!("{}_text", f),
                IndexKey::Geo2dSphere(f) => format!("{}_2dsphere", f),
            })
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Index on the identifier alone, which every collection carries
    /// implicitly
    pub fn is_primary(&self) -> bool {
        matches!(self.keys.as_slice(), [IndexKey::Ascending(field)] if *field == ID_FIELD)
    }

    pub fn is_text(&self) -> bool {
        self.keys.iter().any(|k| matches!(k, IndexKey::Text(_)))
    }
}

/// Indexes every deployment must carry.
///
/// The unique identifier indexes on `users` and `verification_documents` and
/// the `owner_id` lookup are correctness preconditions for the verification
/// workflow; the rest serve the CRUD and search paths.
pub fn catalog() -> Vec<IndexSpec> {
    vec![
        // users
        IndexSpec::ascending(User::COLLECTION, ID_FIELD).unique(),
        IndexSpec::ascending(User::COLLECTION, "email"),
        IndexSpec::ascending(User::COLLECTION, "role"),
        // properties
        IndexSpec::ascending(Property::COLLECTION, "property_type"),
        IndexSpec::ascending(Property::COLLECTION, "current_price"),
        IndexSpec::new(
            Property::COLLECTION,
            vec![IndexKey::Ascending("location.city"), IndexKey::Ascending("location.state")],
        ),
        IndexSpec::new(Property::COLLECTION, vec![IndexKey::Geo2dSphere("location.geo")]),
        IndexSpec::new(
            Property::COLLECTION,
            vec![IndexKey::Text("title"), IndexKey::Text("description")],
        ),
        // listings
        IndexSpec::ascending(Listing::COLLECTION, "property_id"),
        IndexSpec::ascending(Listing::COLLECTION, "lister_id"),
        IndexSpec::ascending(Listing::COLLECTION, "status"),
        // verification documents
        IndexSpec::ascending(VerificationDocument::COLLECTION, ID_FIELD).unique(),
        IndexSpec::ascending(VerificationDocument::COLLECTION, "owner_id"),
        IndexSpec::ascending(VerificationDocument::COLLECTION, "status"),
        // saved listings
        IndexSpec::ascending(SavedListing::COLLECTION, "user_id"),
        IndexSpec::new(
            SavedListing::COLLECTION,
            vec![IndexKey::Ascending("user_id"), IndexKey::Ascending("listing_id")],
        )
        .unique(),
        // notifications
        IndexSpec::ascending(Notification::COLLECTION, "user_id"),
        // audit logs
        IndexSpec::ascending(AuditLog::COLLECTION, "user_id"),
        IndexSpec::new(AuditLog::COLLECTION, vec![IndexKey::Descending("timestamp")]),
        IndexSpec::ascending(AuditLog::COLLECTION, "action"),
    ]
}
