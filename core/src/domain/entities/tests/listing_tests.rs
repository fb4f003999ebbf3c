//! Unit tests for listing entity

use crate::domain::entities::listing::{Listing, ListingStatus, ListingStatusUpdate, NewListing};
use crate::domain::timestamp;
use crate::store::PatchOp;

#[test]
fn test_new_listing_defaults() {
    let listing = Listing::from_new(NewListing::new("p1", "firebase_lister_001"));

    assert_eq!(listing.status, ListingStatus::Pending);
    assert_eq!(listing.views_count, 0);
    assert!(listing.verified_at.is_none());
    assert!(!listing.is_visible());
}

#[test]
fn test_status_update_to_verified_stamps_verified_at() {
    let now = timestamp::now();
    let patch = ListingStatusUpdate::new(ListingStatus::Verified).to_patch(&now);

    let verified_at = patch.ops().iter().find_map(|op| match op {
        PatchOp::Set(field, value) if field == "verified_at" => Some(value.clone()),
        _ => None,
    });
    assert_eq!(verified_at, Some(timestamp::to_value(&now)));
}

#[test]
fn test_status_update_to_hidden_leaves_verified_at() {
    let now = timestamp::now();
    let patch = ListingStatusUpdate::new(ListingStatus::Hidden).to_patch(&now);

    assert!(patch.ops().iter().all(|op| op.field() != "verified_at"));
}
