//! Property search criteria and their translation into a store filter.

use estate_shared::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::domain::entities::PropertyType;
use crate::store::{Filter, FindOptions};

/// Result cap applied when the caller sets none
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Search radius applied when a proximity search sets none
pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 10_000.0;

/// Proximity constraint around a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoProximity {
    pub point: GeoPoint,

    #[serde(default)]
    pub max_distance_meters: Option<f64>,
}

impl GeoProximity {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            max_distance_meters: None,
        }
    }

    pub fn within(mut self, meters: f64) -> Self {
        self.max_distance_meters = Some(meters);
        self
    }

    pub fn radius(&self) -> f64 {
        self.max_distance_meters.unwrap_or(DEFAULT_MAX_DISTANCE_METERS)
    }
}

/// Conjunctive property search. Every supplied criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearch {
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    /// Case-insensitive substring of the state
    pub state: Option<String>,
    /// Exact bedroom count; takes precedence over `min_bedrooms`
    pub bedrooms: Option<u32>,
    pub min_bedrooms: Option<u32>,
    /// Free text over title and description
    pub search_term: Option<String>,
    pub near: Option<GeoProximity>,
    pub limit: Option<usize>,
}

impl PropertySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn price_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = Some(bedrooms);
        self
    }

    pub fn min_bedrooms(mut self, bedrooms: u32) -> Self {
        self.min_bedrooms = Some(bedrooms);
        self
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn near(mut self, proximity: GeoProximity) -> Self {
        self.near = Some(proximity);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Conjunctive filter over the `properties` collection
    pub fn to_filter(&self) -> Filter {
        let mut filters = Vec::new();

        if let Some(property_type) = self.property_type {
            filters.push(Filter::eq("property_type", property_type.as_str()));
        }
        if let Some(min) = self.min_price {
            filters.push(Filter::gte("current_price", min));
        }
        if let Some(max) = self.max_price {
            filters.push(Filter::lte("current_price", max));
        }
        if let Some(city) = non_blank(&self.city) {
            filters.push(Filter::contains_ci("location.city", city));
        }
        if let Some(state) = non_blank(&self.state) {
            filters.push(Filter::contains_ci("location.state", state));
        }
        match (self.bedrooms, self.min_bedrooms) {
            (Some(exact), _) => filters.push(Filter::eq("bedrooms", exact)),
            (None, Some(min)) => filters.push(Filter::gte("bedrooms", min)),
            (None, None) => {}
        }
        if let Some(term) = non_blank(&self.search_term) {
            filters.push(Filter::Text(term.to_string()));
        }
        if let Some(near) = &self.near {
            filters.push(Filter::WithinRadius {
                field: "location.geo".to_string(),
                center: near.point,
                max_distance_meters: near.radius(),
            });
        }

        Filter::all_of(filters)
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions::limit(self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
