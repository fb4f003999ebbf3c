//! Shared configuration and common types for the estate data layer
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types (store connection, environment, logging)
//! - Common type definitions (GeoJSON points)

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig};
pub use types::{GeoError, GeoPoint, EARTH_RADIUS_METERS};
