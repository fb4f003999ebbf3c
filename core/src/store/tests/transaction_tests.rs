//! Optimistic transactions over the in-memory store

use serde_json::json;

use super::doc;
use crate::errors::StoreError;
use crate::store::{DocumentStore, Filter, InMemoryStore, Patch, UpdateCount};

async fn seeded() -> InMemoryStore {
    let store = InMemoryStore::with_catalog();
    store
        .insert("verification_documents", doc(json!({ "_id": "d1", "status": "pending" })))
        .await
        .unwrap();
    store
        .insert("users", doc(json!({ "_id": "U1", "verification_status": "pending" })))
        .await
        .unwrap();
    store
}

async fn status_of(store: &InMemoryStore, collection: &str, id: &str, field: &str) -> String {
    store.find_one(collection, &Filter::id(id)).await.unwrap().unwrap()[field]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_commit_publishes_all_writes() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();

    tx.update_one("verification_documents", &Filter::id("d1"), &Patch::new().set("status", "verified"))
        .await
        .unwrap();
    tx.update_one("users", &Filter::id("U1"), &Patch::new().set("verification_status", "verified"))
        .await
        .unwrap();
    tx.insert("audit_logs", doc(json!({ "action": "verify" }))).await.unwrap();

    // Not visible before commit
    assert_eq!(status_of(&store, "verification_documents", "d1", "status").await, "pending");
    assert_eq!(store.count("audit_logs", &Filter::All).await.unwrap(), 0);

    tx.commit().await.unwrap();

    assert_eq!(status_of(&store, "verification_documents", "d1", "status").await, "verified");
    assert_eq!(status_of(&store, "users", "U1", "verification_status").await, "verified");
    assert_eq!(store.count("audit_logs", &Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_reads_observe_own_staged_writes() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();

    tx.update_one("verification_documents", &Filter::id("d1"), &Patch::new().set("status", "verified"))
        .await
        .unwrap();
    let id = tx.insert("notifications", doc(json!({ "title": "hi" }))).await.unwrap();

    let staged = tx
        .find_one("verification_documents", &Filter::eq("status", "verified"))
        .await
        .unwrap();
    assert!(staged.is_some());
    let pending = tx
        .find_one("verification_documents", &Filter::eq("status", "pending"))
        .await
        .unwrap();
    assert!(pending.is_none());
    assert!(tx.find_one("notifications", &Filter::id(&id)).await.unwrap().is_some());

    tx.abort().await.unwrap();
}

#[tokio::test]
async fn test_abort_discards_writes() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();

    tx.update_one("users", &Filter::id("U1"), &Patch::new().set("verification_status", "verified"))
        .await
        .unwrap();
    tx.abort().await.unwrap();
    tx.abort().await.unwrap();

    assert_eq!(status_of(&store, "users", "U1", "verification_status").await, "pending");
    assert!(matches!(
        tx.find_one("users", &Filter::All).await,
        Err(StoreError::TransactionState { .. })
    ));
}

#[tokio::test]
async fn test_dropping_unfinished_transaction_discards_writes() {
    let store = seeded().await;
    {
        let mut tx = store.start_transaction().await.unwrap();
        tx.update_one("users", &Filter::id("U1"), &Patch::new().set("verification_status", "verified"))
            .await
            .unwrap();
    }

    assert_eq!(status_of(&store, "users", "U1", "verification_status").await, "pending");
}

#[tokio::test]
async fn test_concurrent_commits_on_same_document_conflict() {
    let store = seeded().await;
    let guard = Filter::id("d1").and(Filter::eq("status", "pending"));

    let mut first = store.start_transaction().await.unwrap();
    let mut second = store.start_transaction().await.unwrap();

    let a = first
        .update_one("verification_documents", &guard, &Patch::new().set("status", "verified"))
        .await
        .unwrap();
    let b = second
        .update_one("verification_documents", &guard, &Patch::new().set("status", "rejected"))
        .await
        .unwrap();
    assert_eq!(a, UpdateCount { matched: 1, modified: 1 });
    assert_eq!(b, UpdateCount { matched: 1, modified: 1 });

    first.commit().await.unwrap();
    let result = second.commit().await;

    assert!(matches!(result, Err(StoreError::WriteConflict { .. })));
    assert!(result.unwrap_err().is_transient());
    assert_eq!(status_of(&store, "verification_documents", "d1", "status").await, "verified");
}

#[tokio::test]
async fn test_commit_conflicts_with_concurrent_insert_of_same_id() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();
    tx.insert("users", doc(json!({ "_id": "U2" }))).await.unwrap();

    store.insert("users", doc(json!({ "_id": "U2" }))).await.unwrap();

    assert!(matches!(tx.commit().await, Err(StoreError::WriteConflict { .. })));
}

#[tokio::test]
async fn test_insert_in_transaction_rejects_existing_id() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();

    let result = tx.insert("users", doc(json!({ "_id": "U1" }))).await;
    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
}

#[tokio::test]
async fn test_commit_enforces_unique_indexes_atomically() {
    let store = seeded().await;
    store
        .insert("saved_listings", doc(json!({ "user_id": "U1", "listing_id": "l1" })))
        .await
        .unwrap();

    let mut tx = store.start_transaction().await.unwrap();
    tx.update_one("users", &Filter::id("U1"), &Patch::new().set("verification_status", "verified"))
        .await
        .unwrap();
    tx.insert("saved_listings", doc(json!({ "user_id": "U1", "listing_id": "l1" })))
        .await
        .unwrap();

    assert!(matches!(tx.commit().await, Err(StoreError::DuplicateKey { .. })));
    assert_eq!(status_of(&store, "users", "U1", "verification_status").await, "pending");
    assert_eq!(store.count("saved_listings", &Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_commit_twice_is_a_state_error() {
    let store = seeded().await;
    let mut tx = store.start_transaction().await.unwrap();
    tx.commit().await.unwrap();

    assert!(matches!(tx.commit().await, Err(StoreError::TransactionState { .. })));
    assert!(matches!(tx.abort().await, Err(StoreError::TransactionState { .. })));
}
