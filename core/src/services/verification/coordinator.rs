use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    AuditLog, DocumentStatus, NewAuditLog, User, VerificationDocument, VerificationStatus,
    ACTION_DOCUMENT_REJECTED, ACTION_DOCUMENT_VERIFIED,
};
use crate::domain::timestamp;
use crate::domain::value_objects::{VerificationDecision, VerificationRequest};
use crate::errors::VerificationError;
use crate::store::{Collection, DocumentStore, Filter, Patch, Record, StoreTransaction};

use super::types::{OwnerUpdate, VerificationOutcome};

type VerificationResult<T> = Result<T, VerificationError>;

/// Applies administrator decisions to verification documents.
///
/// The coordinator holds no state besides the store handle; concurrent
/// calls are isolated by the store's transactions. A failed call leaves both
/// the document and its owner untouched and may be retried by the caller.
#[derive(Clone)]
pub struct VerificationCoordinator {
    store: Arc<dyn DocumentStore>,
}

impl VerificationCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Decide a document.
    ///
    /// Approving an identity proof also marks its owner verified, in the same
    /// transaction. Repeating an already recorded decision is a no-op that
    /// succeeds; a different decision on a decided document is a `Conflict`.
    pub async fn verify(
        &self,
        document_id: &str,
        admin_id: &str,
        decision: VerificationDecision,
        rejection_reason: Option<&str>,
    ) -> VerificationResult<VerificationOutcome> {
        self.decide(VerificationRequest {
            document_id: document_id.to_string(),
            admin_id: admin_id.to_string(),
            decision,
            rejection_reason: rejection_reason.map(str::to_string),
        })
        .await
    }

    pub async fn decide(&self, request: VerificationRequest) -> VerificationResult<VerificationOutcome> {
        let request = request.validate()?;

        let mut tx = self.store.start_transaction().await?;
        let result = self.apply(&mut *tx, &request).await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(abort_err) = tx.abort().await {
                    tracing::warn!(
                        document_id = %request.document_id,
                        error = %abort_err,
                        "Failed to abort verification transaction"
                    );
                }
                tracing::warn!(
                    document_id = %request.document_id,
                    admin_id = %request.admin_id,
                    event = "verification_aborted",
                    error = %err,
                    "Verification decision aborted"
                );
                return Err(err);
            }
        };

        if let Err(source) = tx.commit().await {
            tracing::error!(
                document_id = %request.document_id,
                admin_id = %request.admin_id,
                event = "verification_commit_failed",
                error = %source,
                transient = source.is_transient(),
                "Verification transaction failed to commit"
            );
            return Err(VerificationError::TransactionFailed { source });
        }

        tracing::info!(
            document_id = %request.document_id,
            admin_id = %request.admin_id,
            decision = request.decision.as_str(),
            owner_update = ?outcome.owner_update,
            already_applied = outcome.already_applied,
            event = "verification_decided",
            "Verification decision committed"
        );
        Ok(outcome)
    }

    async fn apply(
        &self,
        tx: &mut dyn StoreTransaction,
        request: &VerificationRequest,
    ) -> VerificationResult<VerificationOutcome> {
        let now = timestamp::now();
        let document = load_document(tx, &request.document_id).await?;
        let target = request.decision.status();

        let already_applied = document.status == target
            && document.verified_by.as_deref() == Some(request.admin_id.as_str())
            && document.rejection_reason == request.rejection_reason;

        if !already_applied {
            if document.status.is_terminal() {
                return Err(conflict(&document));
            }
            mark_decided(tx, request, &now).await?;
        }

        let document = load_document(tx, &request.document_id).await?;

        let owner_update = if request.decision == VerificationDecision::Verified && document.is_identity_proof() {
            promote_owner(tx, &document.owner_id, &now).await?
        } else {
            OwnerUpdate::NotApplicable
        };

        let audit_log_id = if already_applied {
            tracing::debug!(
                document_id = %document.id,
                "Verification decision already recorded"
            );
            None
        } else {
            Some(record_audit(tx, request, &document, owner_update).await?)
        };

        Ok(VerificationOutcome {
            document,
            owner_update,
            already_applied,
            audit_log_id,
        })
    }
}

async fn load_document(tx: &mut dyn StoreTransaction, document_id: &str) -> VerificationResult<VerificationDocument> {
    Collection::<VerificationDocument>::find_one_in(tx, &Filter::id(document_id))
        .await?
        .ok_or_else(|| VerificationError::NotFound {
            document_id: document_id.to_string(),
        })
}

fn conflict(document: &VerificationDocument) -> VerificationError {
    VerificationError::Conflict {
        document_id: document.id.clone(),
        current_status: document.status.to_string(),
    }
}

/// Move a pending document to the requested decision. The update is
/// guarded on `pending`, so a concurrent decision makes it match nothing.
async fn mark_decided(
    tx: &mut dyn StoreTransaction,
    request: &VerificationRequest,
    now: &DateTime<Utc>,
) -> VerificationResult<()> {
    let guard = Filter::id(request.document_id.as_str()).and(Filter::eq("status", DocumentStatus::Pending.as_str()));
    let patch = Patch::new()
        .set("status", request.decision.as_str())
        .set("verified_by", request.admin_id.as_str())
        .set("verified_at", timestamp::to_value(now))
        .set_opt("rejection_reason", request.rejection_reason.clone());

    let result = tx.update_one(VerificationDocument::COLLECTION, &guard, &patch).await?;
    if result.matched == 0 {
        let current = load_document(tx, &request.document_id).await?;
        return Err(conflict(&current));
    }
    Ok(())
}

async fn promote_owner(
    tx: &mut dyn StoreTransaction,
    owner_id: &str,
    now: &DateTime<Utc>,
) -> VerificationResult<OwnerUpdate> {
    let verified = VerificationStatus::Verified.as_str();
    let filter = Filter::id(owner_id).and(Filter::ne("verification_status", verified));
    let patch = Patch::new()
        .set("verification_status", verified)
        .set("updated_at", timestamp::to_value(now));

    let result = tx.update_one(User::COLLECTION, &filter, &patch).await?;
    if result.matched > 0 {
        return Ok(OwnerUpdate::Promoted);
    }

    match Collection::<User>::find_one_in(tx, &Filter::id(owner_id)).await? {
        Some(_) => {
            tracing::debug!(owner_id, event = "owner_already_verified", "Document owner already verified");
            Ok(OwnerUpdate::AlreadyVerified)
        }
        None => {
            tracing::warn!(
                owner_id,
                event = "owner_missing",
                "Verified identity proof belongs to a user that does not exist"
            );
            Ok(OwnerUpdate::OwnerMissing)
        }
    }
}

async fn record_audit(
    tx: &mut dyn StoreTransaction,
    request: &VerificationRequest,
    document: &VerificationDocument,
    owner_update: OwnerUpdate,
) -> VerificationResult<String> {
    let action = match request.decision {
        VerificationDecision::Verified => ACTION_DOCUMENT_VERIFIED,
        VerificationDecision::Rejected => ACTION_DOCUMENT_REJECTED,
    };
    let mut input = NewAuditLog::new(action)
        .by(request.admin_id.as_str())
        .on(VerificationDocument::COLLECTION, document.id.as_str())
        .with_metadata("owner_id", document.owner_id.as_str())
        .with_metadata("document_type", document.document_type.as_str())
        .with_metadata("owner_promoted", owner_update == OwnerUpdate::Promoted);
    if let Some(reason) = &request.rejection_reason {
        input = input.with_metadata("rejection_reason", reason.as_str());
    }

    let mut entry = AuditLog::from_new(input);
    Ok(Collection::insert_in(tx, &mut entry).await?)
}
