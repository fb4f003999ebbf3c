//! Verification document persistence. Decisions on documents go through
//! the verification coordinator, never through this repository.

use std::sync::Arc;

use validator::Validate;

use crate::domain::entities::{DocumentStatus, NewVerificationDocument, VerificationDocument};
use crate::errors::DomainResult;
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Sort};

#[derive(Clone)]
pub struct VerificationDocumentRepository {
    documents: Collection<VerificationDocument>,
}

impl VerificationDocumentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents: Collection::new(store),
        }
    }

    /// Record an uploaded document as pending
    pub async fn create(&self, input: NewVerificationDocument) -> DomainResult<VerificationDocument> {
        input.validate()?;
        let mut document = VerificationDocument::from_new(input);
        self.documents.insert(&mut document).await?;

        tracing::info!(
            document_id = %document.id,
            owner_id = %document.owner_id,
            document_type = document.document_type.as_str(),
            event = "verification_document_submitted",
            "Verification document submitted"
        );
        Ok(document)
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<VerificationDocument>> {
        Ok(self.documents.find_by_id(id).await?)
    }

    /// Pending documents, oldest first
    pub async fn list_pending(&self, limit: usize) -> DomainResult<Vec<VerificationDocument>> {
        let options = FindOptions::limit(limit).sorted(Sort::ascending("created_at"));
        Ok(self
            .documents
            .find_many(&Filter::eq("status", DocumentStatus::Pending.as_str()), &options)
            .await?)
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<VerificationDocument>> {
        Ok(self
            .documents
            .find_many(&Filter::eq("owner_id", owner_id), &FindOptions::default())
            .await?)
    }
}
