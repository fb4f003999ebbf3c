//! # Infrastructure Layer
//!
//! Concrete implementations behind the core's record-store contract:
//!
//! - **Database**: MongoDB-backed [`DocumentStore`](estate_core::DocumentStore)
//!   with session transactions, filter translation and error mapping
//! - **Indexes**: creation of the marketplace index catalogue
//! - **Seed**: idempotent sample data for development deployments
//! - **Logging**: `tracing-subscriber` installation from configuration

use std::sync::Arc;

use estate_core::errors::StoreError;
use estate_shared::AppConfig;

pub mod database;
pub mod indexes;
pub mod logging;
pub mod seed;

pub use database::MongoStore;

/// Handles produced by [`initialize`]
#[derive(Clone)]
pub struct Infrastructure {
    pub store: Arc<MongoStore>,
}

/// Connect to the document store and verify it is reachable.
///
/// A failed initial ping is fatal; there is no retry loop.
pub async fn initialize(config: &AppConfig) -> Result<Infrastructure, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        database = %config.database.name,
        event = "infrastructure_init",
        "Initializing infrastructure"
    );

    let store = database::connect(&config.database).await?;

    tracing::info!(event = "infrastructure_ready", "Infrastructure initialized");
    Ok(Infrastructure { store: Arc::new(store) })
}

/// Load configuration from the process environment, honouring a `.env` file
/// when present
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::from_env()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Invalid connection string or client options
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store unreachable or failing during bootstrap
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Logging subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
