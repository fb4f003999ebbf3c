//! Typed view over one collection of a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::StoreResult;

use super::query::{Filter, FindOptions, Patch, UpdateCount};
use super::record::{from_document, to_document, Record};
use super::traits::{DocumentStore, StoreTransaction};

/// Typed handle on the collection holding records of type `R`
pub struct Collection<R> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        R::COLLECTION
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Insert the record and write the assigned identifier back into it
    pub async fn insert(&self, record: &mut R) -> StoreResult<String> {
        let id = self.store.insert(R::COLLECTION, to_document(record)?).await?;
        record.assign_id(id.clone());
        Ok(id)
    }

    pub async fn find_one(&self, filter: &Filter) -> StoreResult<Option<R>> {
        self.store
            .find_one(R::COLLECTION, filter)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        self.find_one(&Filter::id(id)).await
    }

    pub async fn find_many(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<R>> {
        self.store
            .find_many(R::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn update_one(&self, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount> {
        self.store.update_one(R::COLLECTION, filter, patch).await
    }

    pub async fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.delete_one(R::COLLECTION, filter).await
    }

    pub async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.count(R::COLLECTION, filter).await
    }

    /// Read a record through an open transaction
    pub async fn find_one_in(tx: &mut dyn StoreTransaction, filter: &Filter) -> StoreResult<Option<R>> {
        tx.find_one(R::COLLECTION, filter).await?.map(from_document).transpose()
    }

    /// Insert a record through an open transaction
    pub async fn insert_in(tx: &mut dyn StoreTransaction, record: &mut R) -> StoreResult<String> {
        let id = tx.insert(R::COLLECTION, to_document(record)?).await?;
        record.assign_id(id.clone());
        Ok(id)
    }
}
