//! Listing persistence.

use std::sync::Arc;

use validator::Validate;

use crate::domain::entities::{Listing, ListingStatus, ListingStatusUpdate, NewListing};
use crate::domain::timestamp;
use crate::errors::{DomainError, DomainResult};
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Patch};

#[derive(Clone)]
pub struct ListingRepository {
    listings: Collection<Listing>,
}

impl ListingRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            listings: Collection::new(store),
        }
    }

    /// Create a listing; status defaults to `pending` and the view count
    /// starts at zero
    pub async fn create(&self, input: NewListing) -> DomainResult<Listing> {
        input.validate()?;
        let mut listing = Listing::from_new(input);
        self.listings.insert(&mut listing).await?;

        tracing::info!(
            listing_id = %listing.id,
            property_id = %listing.property_id,
            lister_id = %listing.lister_id,
            event = "listing_created",
            "Created listing"
        );
        Ok(listing)
    }

    /// Fetch a listing, optionally counting the read as a view
    pub async fn find_by_id(&self, id: &str, increment_view: bool) -> DomainResult<Option<Listing>> {
        if increment_view {
            self.listings
                .update_one(&Filter::id(id), &Patch::new().inc("views_count", 1))
                .await?;
        }
        Ok(self.listings.find_by_id(id).await?)
    }

    /// A lister's listing of a given property, if any
    pub async fn find_for_property(&self, property_id: &str, lister_id: &str) -> DomainResult<Option<Listing>> {
        let filter = Filter::eq("property_id", property_id).and(Filter::eq("lister_id", lister_id));
        Ok(self.listings.find_one(&filter).await?)
    }

    pub async fn list_by_status(&self, status: ListingStatus, limit: usize) -> DomainResult<Vec<Listing>> {
        Ok(self
            .listings
            .find_many(&Filter::eq("status", status.as_str()), &FindOptions::limit(limit))
            .await?)
    }

    pub async fn list_by_lister(&self, lister_id: &str, limit: usize) -> DomainResult<Vec<Listing>> {
        Ok(self
            .listings
            .find_many(&Filter::eq("lister_id", lister_id), &FindOptions::limit(limit))
            .await?)
    }

    pub async fn update_status(&self, id: &str, update: ListingStatusUpdate) -> DomainResult<Listing> {
        update.validate()?;
        let now = timestamp::now();
        let result = self.listings.update_one(&Filter::id(id), &update.to_patch(&now)).await?;
        if result.matched == 0 {
            return Err(DomainError::not_found("Listing", id));
        }

        tracing::info!(
            listing_id = id,
            status = update.status.as_str(),
            event = "listing_status_changed",
            "Listing status changed"
        );
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", id))
    }

    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        let deleted = self.listings.delete_one(&Filter::id(id)).await? > 0;
        if deleted {
            tracing::info!(listing_id = id, event = "listing_deleted", "Deleted listing");
        }
        Ok(deleted)
    }
}
