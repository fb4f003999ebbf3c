//! Property persistence and search.

use std::sync::Arc;

use validator::Validate;

use crate::domain::entities::{NewProperty, Property, PropertyUpdate};
use crate::domain::timestamp;
use crate::domain::value_objects::PropertySearch;
use crate::errors::{DomainError, DomainResult};
use crate::store::{Collection, DocumentStore, Filter};

#[derive(Clone)]
pub struct PropertyRepository {
    properties: Collection<Property>,
}

impl PropertyRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            properties: Collection::new(store),
        }
    }

    pub async fn create(&self, input: NewProperty) -> DomainResult<Property> {
        input.validate()?;
        let mut property = Property::from_new(input);
        self.properties.insert(&mut property).await?;

        tracing::info!(
            property_id = %property.id,
            property_type = property.property_type.as_str(),
            event = "property_created",
            "Created property"
        );
        Ok(property)
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<Property>> {
        Ok(self.properties.find_by_id(id).await?)
    }

    pub async fn find_by_title(&self, title: &str) -> DomainResult<Option<Property>> {
        Ok(self.properties.find_one(&Filter::eq("title", title)).await?)
    }

    /// Properties satisfying every criterion of `search`, unordered
    pub async fn search(&self, search: &PropertySearch) -> DomainResult<Vec<Property>> {
        let filter = search.to_filter();
        tracing::debug!(?filter, "Searching properties");
        Ok(self.properties.find_many(&filter, &search.find_options()).await?)
    }

    /// Apply an update. A price change is appended to the price history.
    pub async fn update(&self, id: &str, update: PropertyUpdate) -> DomainResult<Property> {
        update.validate()?;
        let current = self
            .properties
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", id))?;

        let now = timestamp::now();
        let patch = update.to_patch(current.current_price, &now);
        let result = self.properties.update_one(&Filter::id(id), &patch).await?;
        if result.matched == 0 {
            return Err(DomainError::not_found("Property", id));
        }

        if let Some(new_price) = update.current_price.filter(|p| *p != current.current_price) {
            tracing::info!(
                property_id = id,
                old_price = current.current_price,
                new_price,
                event = "property_price_changed",
                "Property price changed"
            );
        }

        self.properties
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", id))
    }

    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        let deleted = self.properties.delete_one(&Filter::id(id)).await? > 0;
        if deleted {
            tracing::info!(property_id = id, event = "property_deleted", "Deleted property");
        }
        Ok(deleted)
    }
}
