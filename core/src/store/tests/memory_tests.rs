//! Unit tests for the in-memory document store

use serde_json::json;

use super::{doc, house};
use crate::errors::StoreError;
use crate::store::{
    DocumentStore, Filter, FindOptions, IndexKey, IndexSpec, InMemoryStore, Patch, Sort, UpdateCount,
};

#[tokio::test]
async fn test_insert_assigns_id_when_absent() {
    let store = InMemoryStore::new();

    let id = store
        .insert("users", doc(json!({ "name": "Alice" })))
        .await
        .unwrap();
    assert!(!id.is_empty());

    let found = store.find_one("users", &Filter::id(&id)).await.unwrap().unwrap();
    assert_eq!(found["_id"], id.as_str());
    assert_eq!(found["name"], "Alice");
}

#[tokio::test]
async fn test_insert_keeps_caller_supplied_id() {
    let store = InMemoryStore::new();

    let id = store
        .insert("users", doc(json!({ "_id": "firebase_buyer_001" })))
        .await
        .unwrap();
    assert_eq!(id, "firebase_buyer_001");
}

#[tokio::test]
async fn test_insert_duplicate_id_fails() {
    let store = InMemoryStore::new();
    store.insert("users", doc(json!({ "_id": "u1" }))).await.unwrap();

    let result = store.insert("users", doc(json!({ "_id": "u1" }))).await;
    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
}

#[tokio::test]
async fn test_unique_compound_index_is_enforced() {
    let store = InMemoryStore::with_catalog();
    let saved = |listing: &str| doc(json!({ "user_id": "u1", "listing_id": listing }));

    store.insert("saved_listings", saved("l1")).await.unwrap();
    store.insert("saved_listings", saved("l2")).await.unwrap();
    let result = store.insert("saved_listings", saved("l1")).await;

    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    assert_eq!(store.count("saved_listings", &Filter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn test_update_violating_unique_index_leaves_document_untouched() {
    let store = InMemoryStore::with_catalog();
    store
        .insert("saved_listings", doc(json!({ "_id": "s1", "user_id": "u1", "listing_id": "l1" })))
        .await
        .unwrap();
    store
        .insert("saved_listings", doc(json!({ "_id": "s2", "user_id": "u1", "listing_id": "l2" })))
        .await
        .unwrap();

    let result = store
        .update_one("saved_listings", &Filter::id("s2"), &Patch::new().set("listing_id", "l1"))
        .await;
    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));

    let s2 = store.find_one("saved_listings", &Filter::id("s2")).await.unwrap().unwrap();
    assert_eq!(s2["listing_id"], "l2");
}

#[tokio::test]
async fn test_find_many_sorts_and_limits() {
    let store = InMemoryStore::new();
    for (id, city, price) in [("p1", "Austin", 525000.0), ("p2", "Dallas", 875000.0), ("p3", "Houston", 1800.0)] {
        store.insert("properties", house(id, city, price)).await.unwrap();
    }

    let options = FindOptions::limit(2).sorted(Sort::descending("current_price"));
    let docs = store.find_many("properties", &Filter::All, &options).await.unwrap();

    let ids: Vec<&str> = docs.iter().map(|d| d["_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
}

#[tokio::test]
async fn test_find_many_on_unknown_collection_is_empty() {
    let store = InMemoryStore::new();
    let docs = store
        .find_many("nothing", &Filter::All, &FindOptions::default())
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_update_one_reports_matched_and_modified() {
    let store = InMemoryStore::new();
    store
        .insert("users", doc(json!({ "_id": "u1", "verification_status": "pending" })))
        .await
        .unwrap();

    let patch = Patch::new().set("verification_status", "verified");
    let first = store.update_one("users", &Filter::id("u1"), &patch).await.unwrap();
    let second = store.update_one("users", &Filter::id("u1"), &patch).await.unwrap();
    let missing = store.update_one("users", &Filter::id("nope"), &patch).await.unwrap();

    assert_eq!(first, UpdateCount { matched: 1, modified: 1 });
    assert_eq!(second, UpdateCount { matched: 1, modified: 0 });
    assert_eq!(missing, UpdateCount::none());
}

#[tokio::test]
async fn test_delete_one_and_count() {
    let store = InMemoryStore::new();
    store.insert("listings", doc(json!({ "_id": "l1", "status": "active" }))).await.unwrap();
    store.insert("listings", doc(json!({ "_id": "l2", "status": "pending" }))).await.unwrap();

    assert_eq!(store.count("listings", &Filter::eq("status", "active")).await.unwrap(), 1);
    assert_eq!(store.delete_one("listings", &Filter::id("l1")).await.unwrap(), 1);
    assert_eq!(store.delete_one("listings", &Filter::id("l1")).await.unwrap(), 0);
    assert_eq!(store.count("listings", &Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_text_filter_needs_text_index() {
    let store = InMemoryStore::new();
    store.insert("properties", house("p1", "Austin", 1.0)).await.unwrap();

    let result = store.count("properties", &Filter::Text("granite".into())).await;
    assert!(matches!(result, Err(StoreError::Backend { .. })));

    store
        .create_index(&IndexSpec::new(
            "properties",
            vec![IndexKey::Text("title"), IndexKey::Text("description")],
        ))
        .await
        .unwrap();
    assert_eq!(store.count("properties", &Filter::Text("granite".into())).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_index_is_idempotent_and_validates_existing_data() {
    let store = InMemoryStore::new();
    let spec = IndexSpec::ascending("users", "email").unique();

    store.insert("users", doc(json!({ "email": "a@example.com" }))).await.unwrap();
    store.create_index(&spec).await.unwrap();
    store.create_index(&spec).await.unwrap();

    let dup = store.insert("users", doc(json!({ "email": "a@example.com" }))).await;
    assert!(matches!(dup, Err(StoreError::DuplicateKey { .. })));

    let other = InMemoryStore::new();
    other.insert("users", doc(json!({ "email": "b@example.com" }))).await.unwrap();
    other.insert("users", doc(json!({ "email": "b@example.com" }))).await.unwrap();
    assert!(other.create_index(&spec).await.is_err());
}

#[tokio::test]
async fn test_list_collections_is_sorted() {
    let store = InMemoryStore::new();
    store.insert("users", doc(json!({}))).await.unwrap();
    store.insert("audit_logs", doc(json!({}))).await.unwrap();

    assert_eq!(store.list_collections().await.unwrap(), vec!["audit_logs", "users"]);
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = InMemoryStore::new();
    let clone = store.clone();

    clone.insert("users", doc(json!({ "_id": "u1" }))).await.unwrap();
    assert!(store.find_one("users", &Filter::id("u1")).await.unwrap().is_some());
}
