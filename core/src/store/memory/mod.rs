//! In-memory document store.
//!
//! Thread-safe, async-aware implementation of [`DocumentStore`] backed by a
//! `tokio` read-write lock. Transactions use optimistic concurrency: every
//! document carries a version, a transaction remembers the versions it read
//! or wrote, and commit fails with [`StoreError::WriteConflict`] when any of
//! them changed in the meantime.

mod evaluator;
mod transaction;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::{StoreError, StoreResult};
use crate::store::index::{catalog, IndexSpec};
use crate::store::query::{Document, Filter, FindOptions, Patch, UpdateCount};
use crate::store::record::ensure_id;
use crate::store::traits::{DocumentStore, StoreTransaction};

pub use transaction::MemoryTransaction;

pub(crate) use evaluator::{apply_patch, get_path, matches, sort_documents};

#[derive(Debug, Clone)]
pub(crate) struct StoredDocument {
    pub(crate) version: u64,
    pub(crate) document: Document,
}

/// Documents of one collection in insertion order
#[derive(Debug, Clone, Default)]
pub(crate) struct CollectionData {
    pub(crate) order: Vec<String>,
    pub(crate) docs: HashMap<String, StoredDocument>,
}

impl CollectionData {
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &StoredDocument)> {
        self.order.iter().filter_map(move |id| self.docs.get(id).map(|d| (id, d)))
    }

    pub(crate) fn upsert(&mut self, id: String, stored: StoredDocument) {
        if !self.docs.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.docs.insert(id, stored);
    }

    fn remove(&mut self, id: &str) -> bool {
        let removed = self.docs.remove(id).is_some();
        if removed {
            self.order.retain(|existing| existing != id);
        }
        removed
    }
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) collections: HashMap<String, CollectionData>,
    pub(crate) indexes: Vec<IndexSpec>,
    next_version: u64,
}

impl StoreState {
    pub(crate) fn bump_version(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }

    pub(crate) fn version_of(&self, collection: &str, id: &str) -> Option<u64> {
        self.collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map(|d| d.version)
    }

    /// Fields covered by the collection's text index, if it has one
    pub(crate) fn text_fields(&self, collection: &str) -> Option<Vec<&'static str>> {
        self.indexes
            .iter()
            .find(|spec| spec.collection == collection && spec.is_text())
            .map(|spec| spec.keys.iter().map(|k| k.field()).collect())
    }

    fn matching<'a>(
        &'a self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<(&'a String, &'a StoredDocument)>> {
        let Some(data) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let text_fields = self.text_fields(collection);
        let mut out = Vec::new();
        for (id, stored) in data.iter() {
            if matches(&stored.document, filter, text_fields.as_deref())? {
                out.push((id, stored));
            }
        }
        Ok(out)
    }
}

/// Enforce the collection's unique secondary indexes for `doc`
pub(crate) fn check_unique(
    indexes: &[IndexSpec],
    collection: &str,
    data: &CollectionData,
    id: &str,
    doc: &Document,
) -> StoreResult<()> {
    for spec in indexes
        .iter()
        .filter(|s| s.collection == collection && s.unique && !s.is_primary())
    {
        let key_of = |d: &Document| -> Vec<Value> {
            spec.keys
                .iter()
                .map(|k| get_path(d, k.field()).cloned().unwrap_or(Value::Null))
                .collect()
        };
        let key = key_of(doc);
        let clash = data
            .iter()
            .any(|(other_id, other)| other_id != id && key_of(&other.document) == key);
        if clash {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                message: format!("index {} dup key {:?}", spec.name(), key),
            });
        }
    }
    Ok(())
}

/// Thread-safe in-memory implementation of [`DocumentStore`]
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store without indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store carrying the full marketplace index catalogue
    pub fn with_catalog() -> Self {
        let state = StoreState {
            indexes: catalog(),
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;
        let mut state = self.state.write().await;
        let version = state.bump_version();
        let StoreState {
            collections, indexes, ..
        } = &mut *state;
        let data = collections.entry(collection.to_string()).or_default();

        if data.docs.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                message: format!("_id {}", id),
            });
        }
        check_unique(indexes, collection, data, &id, &document)?;
        data.upsert(id.clone(), StoredDocument { version, document });
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let state = self.state.read().await;
        Ok(state
            .matching(collection, filter)?
            .into_iter()
            .next()
            .map(|(_, stored)| stored.document.clone()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let state = self.state.read().await;
        let mut docs: Vec<Document> = state
            .matching(collection, filter)?
            .into_iter()
            .map(|(_, stored)| stored.document.clone())
            .collect();
        if let Some(sort) = &options.sort {
            sort_documents(&mut docs, sort, |d| d);
        }
        if let Some(limit) = options.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn update_one(&self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount> {
        let mut state = self.state.write().await;
        let target = state
            .matching(collection, filter)?
            .into_iter()
            .next()
            .map(|(id, stored)| (id.clone(), stored.document.clone()));
        let Some((id, mut document)) = target else {
            return Ok(UpdateCount::none());
        };

        if !apply_patch(&mut document, patch)? {
            return Ok(UpdateCount { matched: 1, modified: 0 });
        }

        let version = state.bump_version();
        let StoreState {
            collections, indexes, ..
        } = &mut *state;
        let data = collections.entry(collection.to_string()).or_default();
        check_unique(indexes, collection, data, &id, &document)?;
        data.upsert(id, StoredDocument { version, document });
        Ok(UpdateCount { matched: 1, modified: 1 })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let target = state
            .matching(collection, filter)?
            .into_iter()
            .next()
            .map(|(id, _)| id.clone());
        let Some(id) = target else {
            return Ok(0);
        };
        let removed = state
            .collections
            .get_mut(collection)
            .map(|data| data.remove(&id))
            .unwrap_or(false);
        Ok(u64::from(removed))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state.matching(collection, filter)?.len() as u64)
    }

    async fn create_index(&self, spec: &IndexSpec) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.indexes.contains(spec) {
            return Ok(());
        }
        if spec.is_text() && state.text_fields(spec.collection).is_some() {
            return Err(StoreError::backend(format!(
                "collection {} already has a text index",
                spec.collection
            )));
        }
        if spec.unique && !spec.is_primary() {
            if let Some(data) = state.collections.get(spec.collection) {
                for (id, stored) in data.iter() {
                    check_unique(std::slice::from_ref(spec), spec.collection, data, id, &stored.document)?;
                }
            }
        }
        tracing::debug!(collection = spec.collection, index = %spec.name(), "Created in-memory index");
        state.indexes.push(spec.clone());
        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn start_transaction(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction::new(Arc::clone(&self.state))))
    }
}
