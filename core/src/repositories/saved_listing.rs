//! Saved listings (user bookmarks).

use std::sync::Arc;

use crate::domain::entities::SavedListing;
use crate::errors::{DomainError, DomainResult, StoreError, ValidationError};
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Sort};

#[derive(Clone)]
pub struct SavedListingRepository {
    saved: Collection<SavedListing>,
}

impl SavedListingRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            saved: Collection::new(store),
        }
    }

    fn pair(user_id: &str, listing_id: &str) -> Filter {
        Filter::eq("user_id", user_id).and(Filter::eq("listing_id", listing_id))
    }

    /// Save a listing for a user. Saving twice returns the existing entry.
    pub async fn save(&self, user_id: &str, listing_id: &str, notes: Option<String>) -> DomainResult<SavedListing> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::required("user_id").into());
        }
        if listing_id.trim().is_empty() {
            return Err(ValidationError::required("listing_id").into());
        }

        let filter = Self::pair(user_id, listing_id);
        if let Some(existing) = self.saved.find_one(&filter).await? {
            return Ok(existing);
        }

        let mut entry = SavedListing::new(user_id, listing_id, notes);
        match self.saved.insert(&mut entry).await {
            Ok(_) => {
                tracing::debug!(user_id, listing_id, event = "listing_saved", "Saved listing");
                Ok(entry)
            }
            // Lost a race with a concurrent save of the same pair
            Err(StoreError::DuplicateKey { .. }) => self
                .saved
                .find_one(&filter)
                .await?
                .ok_or_else(|| DomainError::Conflict {
                    message: format!("Listing {} already saved by {}", listing_id, user_id),
                }),
            Err(err) => Err(err.into()),
        }
    }

    /// A user's saved listings, most recent first
    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<SavedListing>> {
        let options = FindOptions::default().sorted(Sort::descending("saved_at"));
        Ok(self.saved.find_many(&Filter::eq("user_id", user_id), &options).await?)
    }

    pub async fn remove(&self, id: &str) -> DomainResult<bool> {
        Ok(self.saved.delete_one(&Filter::id(id)).await? > 0)
    }
}
