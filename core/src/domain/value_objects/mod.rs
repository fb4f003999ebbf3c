//! Value objects representing immutable domain concepts.

pub mod property_search;
pub mod verification;


pub use property_search::{GeoProximity, PropertySearch, DEFAULT_MAX_DISTANCE_METERS, DEFAULT_SEARCH_LIMIT};
pub use verification::{VerificationDecision, VerificationRequest};
