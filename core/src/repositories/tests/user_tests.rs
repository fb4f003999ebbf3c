//! Unit tests for the user repository

use super::repos;
use crate::domain::entities::{NewUser, UserRole, UserUpdate, VerificationStatus};
use crate::errors::{DomainError, ValidationError};

fn bob() -> NewUser {
    NewUser::new("firebase_buyer_002", "bob@example.com", "Bob Williams", UserRole::Buyer)
}

#[tokio::test]
async fn test_create_and_find_user() {
    let repos = repos();

    let created = repos.users.create(bob()).await.unwrap();
    assert_eq!(created.verification_status, VerificationStatus::NotSubmitted);

    let found = repos.users.find_by_id("firebase_buyer_002").await.unwrap();
    assert_eq!(found, Some(created.clone()));

    let by_email = repos.users.find_by_email("bob@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));
}

#[tokio::test]
async fn test_duplicate_user_id_conflicts() {
    let repos = repos();
    repos.users.create(bob()).await.unwrap();

    let result = repos.users.create(bob()).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_invalid_user_is_rejected_before_storage() {
    let repos = repos();
    let mut input = bob();
    input.email = "bob-at-example".into();

    let result = repos.users.create(input).await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::InvalidFormat { ref field })) if field == "email"
    ));
    assert!(repos.users.find_by_id("firebase_buyer_002").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_by_role_respects_limit() {
    let repos = repos();
    for n in 0..3 {
        repos
            .users
            .create(NewUser::new(format!("buyer_{n}"), format!("b{n}@example.com"), "Buyer", UserRole::Buyer))
            .await
            .unwrap();
    }
    repos
        .users
        .create(NewUser::new("admin", "admin@example.com", "Admin", UserRole::Admin))
        .await
        .unwrap();

    assert_eq!(repos.users.list_by_role(UserRole::Buyer, 100).await.unwrap().len(), 3);
    assert_eq!(repos.users.list_by_role(UserRole::Buyer, 2).await.unwrap().len(), 2);
    assert_eq!(repos.users.list_by_role(UserRole::Renter, 100).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_user_bumps_updated_at() {
    let repos = repos();
    let created = repos.users.create(bob()).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;

    let updated = repos
        .users
        .update(
            &created.id,
            UserUpdate {
                phone: Some("+1234567891".into()),
                two_factor_enabled: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.phone.as_deref(), Some("+1234567891"));
    assert!(updated.two_factor_enabled);
    assert_eq!(updated.name, created.name);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let repos = repos();
    let result = repos.users.update("nobody", UserUpdate::default()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_user() {
    let repos = repos();
    repos.users.create(bob()).await.unwrap();

    assert!(repos.users.delete("firebase_buyer_002").await.unwrap());
    assert!(!repos.users.delete("firebase_buyer_002").await.unwrap());
}
