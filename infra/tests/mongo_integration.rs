//! Integration tests against a live MongoDB replica set.
//!
//! Run with `MONGO_URL` pointing at a replica set (transactions need one):
//! `cargo test -p estate_infra -- --ignored`

use std::sync::Arc;

use estate_core::domain::entities::{DocumentType, NewUser, NewVerificationDocument, UserRole, VerificationStatus};
use estate_core::domain::value_objects::VerificationDecision;
use estate_core::{DocumentStore, OwnerUpdate, Repositories, VerificationCoordinator, VerificationError};
use estate_infra::database::connect;
use estate_infra::{indexes, seed, MongoStore};
use estate_shared::config::DatabaseConfig;

async fn scratch_store(suffix: &str) -> MongoStore {
    let url = std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_string());
    let name = format!("estate_it_{}_{}", suffix, std::process::id());
    let store = connect(&DatabaseConfig::new(url, name)).await.unwrap();
    store.database().drop(None).await.unwrap();
    indexes::ensure_indexes(&store).await.unwrap();
    store
}

#[tokio::test]
#[ignore] // Requires a running MongoDB replica set
async fn test_seed_and_search_round_trip() {
    let store = scratch_store("seed").await;
    let repos = Repositories::new(Arc::new(store.clone()));

    let report = seed::seed(&repos).await.unwrap();
    assert_eq!(report.properties_created, 3);

    let analytics = repos.analytics.snapshot().await.unwrap();
    assert_eq!(analytics.total_users, 5);
    assert_eq!(analytics.active_listings, 3);

    let collections = store.list_collections().await.unwrap();
    assert!(collections.contains(&"properties".to_string()));

    store.database().drop(None).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires a running MongoDB replica set
async fn test_verification_promotes_owner_atomically() {
    let store = scratch_store("verify").await;
    let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());
    let repos = Repositories::new(Arc::clone(&shared));
    let coordinator = VerificationCoordinator::new(Arc::clone(&shared));

    repos
        .users
        .create(NewUser::new("U1", "u1@example.com", "Owner", UserRole::Lister))
        .await
        .unwrap();
    let document = repos
        .verification_documents
        .create(NewVerificationDocument::new(
            "U1",
            DocumentType::IdentityProof,
            "https://files.example.com/id.png",
        ))
        .await
        .unwrap();

    let outcome = coordinator
        .verify(&document.id, "admin_1", VerificationDecision::Verified, None)
        .await
        .unwrap();
    assert_eq!(outcome.owner_update, OwnerUpdate::Promoted);

    let user = repos.users.find_by_id("U1").await.unwrap().unwrap();
    assert_eq!(user.verification_status, VerificationStatus::Verified);

    let rejected = coordinator
        .verify(&document.id, "admin_2", VerificationDecision::Rejected, Some("blurry"))
        .await;
    assert!(matches!(rejected, Err(VerificationError::Conflict { .. })));

    store.database().drop(None).await.unwrap();
}
