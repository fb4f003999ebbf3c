//! End-to-end verification workflow over the in-memory store

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use estate_core::domain::entities::{
        DocumentStatus, DocumentType, NewUser, NewVerificationDocument, UserRole, VerificationStatus,
    };
    use estate_core::domain::value_objects::VerificationDecision;
    use estate_core::errors::VerificationError;
    use estate_core::repositories::Repositories;
    use estate_core::services::verification::{OwnerUpdate, VerificationCoordinator};
    use estate_core::store::{DocumentStore, InMemoryStore};

    fn setup() -> (Repositories, VerificationCoordinator) {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::with_catalog());
        (Repositories::new(Arc::clone(&store)), VerificationCoordinator::new(store))
    }

    #[tokio::test]
    async fn test_upload_then_verify_flow() {
        let (repos, coordinator) = setup();

        repos
            .users
            .create(NewUser::new("U1", "u1@example.com", "Una Owner", UserRole::Buyer))
            .await
            .unwrap();
        let document = repos
            .verification_documents
            .create(NewVerificationDocument::new(
                "U1",
                DocumentType::IdentityProof,
                "https://files.example.com/passport.jpg",
            ))
            .await
            .unwrap();

        let pending = repos.verification_documents.list_pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(repos.analytics.snapshot().await.unwrap().pending_verifications, 1);

        let outcome = coordinator
            .verify(&document.id, "admin_1", VerificationDecision::Verified, None)
            .await
            .unwrap();
        assert_eq!(outcome.owner_update, OwnerUpdate::Promoted);

        let user = repos.users.find_by_id("U1").await.unwrap().unwrap();
        assert_eq!(user.verification_status, VerificationStatus::Verified);
        assert!(repos.verification_documents.list_pending(10).await.unwrap().is_empty());
        assert_eq!(repos.analytics.snapshot().await.unwrap().pending_verifications, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_decisions_on_one_document() {
        let (repos, coordinator) = setup();
        repos
            .users
            .create(NewUser::new("U1", "u1@example.com", "Una Owner", UserRole::Buyer))
            .await
            .unwrap();
        let document = repos
            .verification_documents
            .create(NewVerificationDocument::new(
                "U1",
                DocumentType::IdentityProof,
                "https://files.example.com/passport.jpg",
            ))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let coordinator = coordinator.clone();
            let document_id = document.id.clone();
            handles.push(tokio::spawn(async move {
                let admin = format!("admin_{i}");
                if i % 2 == 0 {
                    coordinator
                        .verify(&document_id, &admin, VerificationDecision::Verified, None)
                        .await
                } else {
                    coordinator
                        .verify(&document_id, &admin, VerificationDecision::Rejected, Some("mismatch"))
                        .await
                }
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(VerificationError::Conflict { .. }) | Err(VerificationError::TransactionFailed { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);

        let stored = repos
            .verification_documents
            .find_by_id(&document.id)
            .await
            .unwrap()
            .unwrap();
        let user = repos.users.find_by_id("U1").await.unwrap().unwrap();
        assert!(stored.status.is_terminal());
        assert!(stored.verified_at.is_some());
        assert_eq!(
            user.verification_status == VerificationStatus::Verified,
            stored.status == DocumentStatus::Verified
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identity_proofs_of_one_owner() {
        let (repos, coordinator) = setup();
        repos
            .users
            .create(NewUser::new("U1", "u1@example.com", "Una Owner", UserRole::Lister))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for n in 0..4 {
            let document = repos
                .verification_documents
                .create(NewVerificationDocument::new(
                    "U1",
                    DocumentType::IdentityProof,
                    format!("https://files.example.com/id-{n}.jpg"),
                ))
                .await
                .unwrap();
            ids.push(document.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move {
                    coordinator
                        .verify(&id, "admin_1", VerificationDecision::Verified, None)
                        .await
                })
            })
            .collect();

        let mut committed = Vec::new();
        for (id, handle) in ids.iter().zip(handles) {
            if handle.await.unwrap().is_ok() {
                committed.push(id.clone());
            }
        }
        assert!(!committed.is_empty());

        // Every committed approval left its owner verified
        let user = repos.users.find_by_id("U1").await.unwrap().unwrap();
        assert_eq!(user.verification_status, VerificationStatus::Verified);
        for id in &committed {
            let stored = repos.verification_documents.find_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.status, DocumentStatus::Verified);
        }
    }
}
