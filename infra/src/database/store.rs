//! [`DocumentStore`] over a MongoDB database.

use async_trait::async_trait;
use bson::doc;
use estate_core::errors::StoreResult;
use estate_core::store::{
    ensure_id, Document, DocumentStore, Filter, FindOptions, IndexSpec, Patch, StoreTransaction, UpdateCount,
};
use futures_util::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use super::errors::map_error;
use super::query;
use super::transaction::MongoTransaction;

/// MongoDB-backed record store.
///
/// Cheap to clone; clones share the driver's connection pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self { client, db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| map_error(e, "admin"))?;
        Ok(())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;
        let document = query::to_bson_document(&document)?;
        self.collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(query::filter_to_bson(filter)?, None)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(found.map(query::from_bson_document))
    }

    async fn find_many(&self, collection: &str, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(query::filter_to_bson(filter)?, query::find_options(options))
            .await
            .map_err(|e| map_error(e, collection))?;
        let documents: Vec<bson::Document> = cursor.try_collect().await.map_err(|e| map_error(e, collection))?;
        Ok(documents.into_iter().map(query::from_bson_document).collect())
    }

    async fn update_one(&self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount> {
        if patch.is_empty() {
            let matched = self.count(collection, filter).await?.min(1);
            return Ok(UpdateCount { matched, modified: 0 });
        }

        let result = self
            .collection(collection)
            .update_one(query::filter_to_bson(filter)?, query::patch_to_update(patch)?, None)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(UpdateCount {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_one(query::filter_to_bson(filter)?, None)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(query::filter_to_bson(filter)?, None)
            .await
            .map_err(|e| map_error(e, collection))
    }

    async fn create_index(&self, spec: &IndexSpec) -> StoreResult<()> {
        // The server maintains the `_id` index itself
        if spec.is_primary() {
            return Ok(());
        }

        let options = IndexOptions::builder().unique(spec.unique).name(spec.name()).build();
        let model = IndexModel::builder()
            .keys(query::index_keys(&spec.keys))
            .options(options)
            .build();
        self.collection(spec.collection)
            .create_index(model, None)
            .await
            .map_err(|e| map_error(e, spec.collection))?;

        tracing::debug!(
            collection = spec.collection,
            index = %spec.name(),
            unique = spec.unique,
            "Index ensured"
        );
        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut names = self
            .db
            .list_collection_names(None)
            .await
            .map_err(|e| map_error(e, "admin"))?;
        names.sort();
        Ok(names)
    }

    async fn start_transaction(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let mut session = self
            .client
            .start_session(None)
            .await
            .map_err(|e| map_error(e, "session"))?;
        session
            .start_transaction(None)
            .await
            .map_err(|e| map_error(e, "session"))?;
        Ok(Box::new(MongoTransaction::new(self.db.clone(), session)))
    }
}
