//! Marketplace-wide counters.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::{DocumentStatus, Listing, ListingStatus, Property, User, VerificationDocument};
use crate::errors::DomainResult;
use crate::store::{DocumentStore, Filter, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total_users: u64,
    pub total_properties: u64,
    pub total_listings: u64,
    pub active_listings: u64,
    pub pending_verifications: u64,
}

#[derive(Clone)]
pub struct AnalyticsRepository {
    store: Arc<dyn DocumentStore>,
}

impl AnalyticsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> DomainResult<Analytics> {
        let store = &self.store;
        Ok(Analytics {
            total_users: store.count(User::COLLECTION, &Filter::All).await?,
            total_properties: store.count(Property::COLLECTION, &Filter::All).await?,
            total_listings: store.count(Listing::COLLECTION, &Filter::All).await?,
            active_listings: store
                .count(Listing::COLLECTION, &Filter::eq("status", ListingStatus::Active.as_str()))
                .await?,
            pending_verifications: store
                .count(
                    VerificationDocument::COLLECTION,
                    &Filter::eq("status", DocumentStatus::Pending.as_str()),
                )
                .await?,
        })
    }
}
