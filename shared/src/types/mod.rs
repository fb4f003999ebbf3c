//! Common type definitions shared across crates

pub mod geo;

pub use geo::{GeoError, GeoPoint, EARTH_RADIUS_METERS};
