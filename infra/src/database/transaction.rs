//! [`StoreTransaction`] over a driver session.

use async_trait::async_trait;
use estate_core::errors::{StoreError, StoreResult};
use estate_core::store::{ensure_id, Document, Filter, Patch, StoreTransaction, UpdateCount};
use mongodb::{ClientSession, Collection, Database};

use super::errors::map_error;
use super::query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Active,
    Committed,
    Aborted,
}

/// Multi-document transaction bound to one client session.
///
/// Dropping the session with the transaction still open makes the driver
/// abort it on the server.
pub struct MongoTransaction {
    db: Database,
    session: ClientSession,
    status: Status,
}

impl MongoTransaction {
    pub(crate) fn new(db: Database, session: ClientSession) -> Self {
        Self {
            db,
            session,
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

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl StoreTransaction for MongoTransaction {
    async fn insert(&mut self, collection: &str, mut document: Document) -> StoreResult<String> {
        self.ensure_active()?;
        let id = ensure_id(&mut document)?;
        let document = query::to_bson_document(&document)?;
        self.collection(collection)
            .insert_one_with_session(document, None, &mut self.session)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(id)
    }

    async fn find_one(&mut self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.ensure_active()?;
        let found = self
            .collection(collection)
            .find_one_with_session(query::filter_to_bson(filter)?, None, &mut self.session)
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(found.map(query::from_bson_document))
    }

    async fn update_one(&mut self, collection: &str, filter: &Filter, patch: &Patch) -> StoreResult<UpdateCount> {
        self.ensure_active()?;
        if patch.is_empty() {
            let matched = u64::from(self.find_one(collection, filter).await?.is_some());
            return Ok(UpdateCount { matched, modified: 0 });
        }

        let result = self
            .collection(collection)
            .update_one_with_session(
                query::filter_to_bson(filter)?,
                query::patch_to_update(patch)?,
                None,
                &mut self.session,
            )
            .await
            .map_err(|e| map_error(e, collection))?;
        Ok(UpdateCount {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn commit(&mut self) -> StoreResult<()> {
        self.ensure_active()?;
        match self.session.commit_transaction().await {
            Ok(()) => {
                self.status = Status::Committed;
                Ok(())
            }
            Err(err) => {
                // A failed commit leaves nothing applied; the session can no
                // longer be used for this transaction
                self.status = Status::Aborted;
                Err(map_error(err, "transaction"))
            }
        }
    }

    async fn abort(&mut self) -> StoreResult<()> {
        match self.status {
            Status::Aborted => Ok(()),
            Status::Committed => self.ensure_active(),
            Status::Active => {
                self.status = Status::Aborted;
                self.session
                    .abort_transaction()
                    .await
                    .map_err(|e| map_error(e, "transaction"))
            }
        }
    }
}

impl Drop for MongoTransaction {
    fn drop(&mut self) {
        if self.status == Status::Active {
            tracing::debug!("MongoDB transaction dropped while active; the driver aborts it");
        }
    }
}
