//! Domain layer containing marketplace entities and value objects.

pub mod entities;
pub mod timestamp;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::*;
pub use value_objects::*;
