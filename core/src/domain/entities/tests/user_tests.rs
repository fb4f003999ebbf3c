//! Unit tests for user entity

use validator::Validate;

use crate::domain::entities::user::{NewUser, User, UserRole, UserUpdate, VerificationStatus};
use crate::store::{to_document, PatchOp};

fn alice() -> NewUser {
    NewUser::new("firebase_buyer_001", "alice@example.com", "Alice Johnson", UserRole::Buyer)
}

#[test]
fn test_new_user_applies_defaults() {
    let user = User::from_new(alice());

    assert_eq!(user.id, "firebase_buyer_001");
    assert_eq!(user.verification_status, VerificationStatus::NotSubmitted);
    assert!(!user.two_factor_enabled);
    assert!(!user.is_suspended);
    assert!(!user.is_banned);
    assert!(user.is_active());
    assert_eq!(user.created_at, user.updated_at);
}

#[test]
fn test_new_user_keeps_supplied_status() {
    let user = User::from_new(alice().with_verification_status(VerificationStatus::Verified));
    assert!(user.is_verified());
}

#[test]
fn test_new_user_validation() {
    assert!(alice().validate().is_ok());

    let mut bad_email = alice();
    bad_email.email = "not-an-email".into();
    assert!(bad_email.validate().is_err());

    let mut blank_id = alice();
    blank_id.id = String::new();
    assert!(blank_id.validate().is_err());
}

#[test]
fn test_user_document_shape() {
    let user = User::from_new(alice().with_phone("+1234567890"));
    let doc = to_document(&user).unwrap();

    assert_eq!(doc["_id"], "firebase_buyer_001");
    assert_eq!(doc["role"], "buyer");
    assert_eq!(doc["verification_status"], "not_submitted");
    assert_eq!(doc["phone"], "+1234567890");
    assert!(!doc.contains_key("profile_picture"));
    assert!(doc["created_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_user_update_patch_only_sets_supplied_fields() {
    let update = UserUpdate {
        name: Some("Alice J.".into()),
        is_suspended: Some(true),
        ..Default::default()
    };
    let now = crate::domain::timestamp::now();
    let patch = update.to_patch(&now);

    let fields: Vec<&str> = patch.ops().iter().map(PatchOp::field).collect();
    assert_eq!(fields, vec!["name", "is_suspended", "updated_at"]);
    assert!(!update.is_empty());
    assert!(UserUpdate::default().is_empty());
}
