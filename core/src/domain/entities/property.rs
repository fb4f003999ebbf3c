//! Property entity with location and price history.

use chrono::{DateTime, Utc};
use estate_shared::GeoPoint;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::timestamp;
use crate::store::Patch;

/// Reason recorded for the first price-history entry
pub const INITIAL_PRICE_REASON: &str = "Initial listing";

/// Reason recorded when a price change carries none
pub const DEFAULT_PRICE_CHANGE_REASON: &str = "Price updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
    Land,
    Rental,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
            PropertyType::Rental => "rental",
        }
    }
}

/// Postal address with an optional GeoJSON point for proximity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(length(min = 1))]
    pub street: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub state: String,

    #[validate(length(min = 1))]
    pub zip_code: String,

    #[validate(length(min = 1))]
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub price: f64,

    #[serde(with = "timestamp")]
    pub changed_at: DateTime<Utc>,

    pub reason: String,
}

impl PriceHistoryEntry {
    pub fn new(price: f64, reason: impl Into<String>, changed_at: DateTime<Utc>) -> Self {
        Self {
            price,
            changed_at,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub title: String,

    pub description: String,

    pub property_type: PropertyType,

    pub current_price: f64,

    #[serde(default)]
    pub price_history: Vec<PriceHistoryEntry>,

    pub location: Location,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub documents: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_tour_url: Option<String>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a property
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProperty {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub property_type: PropertyType,

    #[validate(range(min = 0.0))]
    pub current_price: f64,

    #[validate]
    pub location: Location,

    #[validate(range(max = 1000))]
    pub bedrooms: Option<u32>,

    #[validate(range(min = 0.0))]
    pub bathrooms: Option<f64>,

    #[validate(range(min = 0.0))]
    pub area_sqft: Option<f64>,

    #[validate(range(min = 1600, max = 2200))]
    pub year_built: Option<i32>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[validate(url)]
    pub virtual_tour_url: Option<String>,
}

impl Property {
    /// Build a property from validated input. The price history starts with
    /// the initial asking price.
    pub fn from_new(input: NewProperty) -> Self {
        let now = timestamp::now();
        Self {
            id: String::new(),
            title: input.title,
            description: input.description,
            property_type: input.property_type,
            current_price: input.current_price,
            price_history: vec![PriceHistoryEntry::new(input.current_price, INITIAL_PRICE_REASON, now)],
            location: input.location,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            area_sqft: input.area_sqft,
            year_built: input.year_built,
            amenities: input.amenities,
            images: input.images,
            documents: Vec::new(),
            virtual_tour_url: input.virtual_tour_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a property
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub property_type: Option<PropertyType>,

    #[validate(range(min = 0.0))]
    pub current_price: Option<f64>,

    /// Recorded in the price history when the price changes
    pub price_change_reason: Option<String>,

    pub bedrooms: Option<u32>,

    pub bathrooms: Option<f64>,

    pub area_sqft: Option<f64>,

    pub amenities: Option<Vec<String>>,

    pub images: Option<Vec<String>>,

    #[validate(url)]
    pub virtual_tour_url: Option<String>,
}

impl PropertyUpdate {
    /// Store patch for this update against the current asking price.
    ///
    /// A price that differs from `current_price` appends a history entry.
    pub fn to_patch(&self, current_price: f64, now: &DateTime<Utc>) -> Patch {
        let mut patch = Patch::new()
            .set_opt("title", self.title.clone())
            .set_opt("description", self.description.clone())
            .set_opt("property_type", self.property_type.map(|t| t.as_str()))
            .set_opt("current_price", self.current_price)
            .set_opt("bedrooms", self.bedrooms)
            .set_opt("bathrooms", self.bathrooms)
            .set_opt("area_sqft", self.area_sqft)
            .set_opt("amenities", self.amenities.clone())
            .set_opt("images", self.images.clone())
            .set_opt("virtual_tour_url", self.virtual_tour_url.clone())
            .set("updated_at", timestamp::to_value(now));

        if let Some(price) = self.current_price.filter(|p| *p != current_price) {
            let reason = self
                .price_change_reason
                .clone()
                .unwrap_or_else(|| DEFAULT_PRICE_CHANGE_REASON.to_string());
            let entry = serde_json::json!({
                "price": price,
                "changed_at": timestamp::to_value(now),
                "reason": reason,
            });
            patch = patch.push("price_history", entry);
        }
        patch
    }
}
