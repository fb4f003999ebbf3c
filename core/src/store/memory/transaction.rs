use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::{StoreError, StoreResult};
use crate::store::query::{Document, Filter, Patch, UpdateCount};
use crate::store::record::ensure_id;
use crate::store::traits::StoreTransaction;

use super::{apply_patch, check_unique, matches, CollectionData, StoreState, StoredDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Active,
    Committed,
    Aborted,
}

/// Optimistic transaction over an [`super::InMemoryStore`].
///
/// Reads see committed data overlaid with this transaction's own staged
/// writes. Every document read or written records the version it had; commit
/// fails with [`StoreError::WriteConflict`] if any of those versions moved.
pub struct MemoryTransaction {
    state: Arc<RwLock<StoreState>>,
    staged: HashMap<String, CollectionData>,
    /// `None` records that the document must still be absent at commit
    observed: HashMap<(String, String), Option<u64>>,
    status: Status,
}

impl MemoryTransaction {
    pub(crate) fn new(state: Arc<RwLock<StoreState>>) -> Self {
        Self {
            state,
            staged: HashMap::new(),
            observed: HashMap::new(),
            status: Status::Active,
        }
    }

    fn ensure_active(&self) -> StoreResult<()> {
        match self.status {
            Status::Active => Ok(()),
            Status::Committed => Err(StoreError::TransactionState {
                message: "transaction already committed".to_string(),
            }),
            Status::Aborted => Err(StoreError::TransactionState {
                message: "transaction already aborted".to_string(),
            }),
        }
    }

    fn observe(&mut self, collection: &str, id: &str, version: Option<u64>) {
        self.observed
            .entry((collection.to_string(), id.to_string()))
            .or_insert(version);
    }

    /// First document matching `filter` in the merged view, with the
    /// committed version it was derived from
    async fn locate(&self, collection: &str, filter: &Filter) -> StoreResult<Option<(String, Document, Option<u64>)>> {
        let state = self.state.read().await;
        let text_fields = state.text_fields(collection);
        let staged = self.staged.get(collection);
        let committed = state.collections.get(collection);

        if let Some(committed) = committed {
            for (id, stored) in committed.iter() {
                let document = staged
                    .and_then(|s| s.docs.get(id))
                    .map(|s| &s.document)
                    .unwrap_or(&stored.document);
                if matches(document, filter, text_fields.as_deref())? {
                    return Ok(Some((id.clone(), document.clone(), Some(stored.version))));
                }
            }
        }

        if let Some(staged) = staged {
            for (id, stored) in staged.iter() {
                if committed.map(|c| c.docs.contains_key(id)).unwrap_or(false) {
                    continue;
                }
                if matches(&stored.document, filter, text_fields.as_deref())? {
                    return Ok(Some((id.clone(), stored.document.clone(), None)));
                }
            }
        }
        Ok(None)
    }

    fn stage(&mut self, collection: &str, id: String, document: Document) {
        self.staged
            .entry(collection.to_string())
            .or_default()
            .upsert(id, StoredDocument { version: 0, document });
    }

    async fn apply(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;

        for ((collection, id), expected) in &self.observed {
            if state.version_of(collection, id) != *expected {
                tracing::debug!(collection = %collection, id = %id, "In-memory transaction write conflict");
                return Err(StoreError::WriteConflict {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
        }

        let mut updated: HashMap<String, CollectionData> = HashMap::new();
        for (collection, staged) in &self.staged {
            let mut data = state.collections.get(collection).cloned().unwrap_or_default();
            for (id, stored) in staged.iter() {
                let version = state.bump_version();
                data.upsert(
                    id.clone(),
                    StoredDocument {
                        version,
                        document: stored.document.clone(),
                    },
                );
            }
            let touched: HashSet<&String> = staged.docs.keys().collect();
            for (id, stored) in data.iter().filter(|(id, _)| touched.contains(id)) {
                check_unique(&state.indexes, collection, &data, id, &stored.document)?;
            }
            updated.insert(collection.clone(), data);
        }

        state.collections.extend(updated);
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert(&mut self, collection: &str, mut document: Document) -> StoreResult<String> {
        self.ensure_active()?;
        let id = ensure_id(&mut document)?;

        let exists = self.locate(collection, &Filter::id(id.clone())).await?.is_some();
        if exists {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                message: format!("_id {}", id),
            });
        }

        self.observe(collection, &id, None);
        self.stage(collection, id.clone(), document);
        Ok(id)
    }

    async fn find_one(&mut self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.ensure_active()?;
        match self.locate(collection, filter).await? {
            Some((id, document, version)) => {
                self.observe(collection, &id, version);
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn update_one(&mut self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount> {
        self.ensure_active()?;
        let Some((id, mut document, version)) = self.locate(collection, filter).await? else {
            return Ok(UpdateCount::none());
        };
        self.observe(collection, &id, version);

        if !apply_patch(&mut document, patch)? {
            return Ok(UpdateCount { matched: 1, modified: 0 });
        }
        self.stage(collection, id, document);
        Ok(UpdateCount { matched: 1, modified: 1 })
    }

    async fn commit(&mut self) -> StoreResult<()> {
        self.ensure_active()?;
        let result = self.apply().await;
        self.staged.clear();
        self.observed.clear();
        self.status = match result {
            Ok(()) => Status::Committed,
            Err(_) => Status::Aborted,
        };
        result
    }

    async fn abort(&mut self) -> StoreResult<()> {
        match self.status {
            Status::Committed => Err(StoreError::TransactionState {
                message: "cannot abort a committed transaction".to_string(),
            }),
            Status::Active | Status::Aborted => {
                self.staged.clear();
                self.observed.clear();
                self.status = Status::Aborted;
                Ok(())
            }
        }
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if self.status == Status::Active && !self.staged.is_empty() {
            tracing::debug!(
                collections = self.staged.len(),
                "Discarding uncommitted in-memory transaction"
            );
        }
    }
}
