//! Store and transaction traits implemented by storage backends.

use async_trait::async_trait;

use crate::errors::StoreResult;

use super::index::IndexSpec;
use super::query::{Document, Filter, FindOptions, Patch, UpdateCount};

/// A document store holding named collections.
///
/// Implementations must be safe to share between concurrent callers; the
/// store handle is the only shared resource of the data layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Verify the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Insert a document, assigning an identifier when `_id` is absent or
    /// empty. Returns the stored identifier.
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<String>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Apply `patch` to the first document matching `filter`
    async fn update_one(&self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount>;

    /// Delete the first document matching `filter`; returns the number deleted
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Create an index; creating an identical index twice is a no-op
    async fn create_index(&self, spec: &IndexSpec) -> StoreResult<()>;

    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Open a transaction. Operations issued through it are staged until
    /// [`StoreTransaction::commit`]; dropping it unfinished discards them.
    async fn start_transaction(&self) -> StoreResult<Box<dyn StoreTransaction>>;
}

/// A multi-document transaction scoped to a single store.
///
/// Staged writes become visible to other readers atomically on commit.
/// A transaction that is dropped without `commit` or `abort` is aborted.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert(&mut self, collection: &str, document: Document) -> StoreResult<String>;

    /// Read through the transaction, observing its own staged writes
    async fn find_one(&mut self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    async fn update_one(&mut self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount>;

    async fn commit(&mut self) -> StoreResult<()>;

    async fn abort(&mut self) -> StoreResult<()>;
}
