//! Client construction from [`DatabaseConfig`].

use estate_core::DocumentStore;
use estate_shared::config::DatabaseConfig;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::InfrastructureError;

use super::store::MongoStore;

/// Application name reported to the server when none is configured
pub const DEFAULT_APP_NAME: &str = "estate-data";

/// Build client options from configuration without contacting the server
pub async fn client_options(config: &DatabaseConfig) -> Result<ClientOptions, InfrastructureError> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| InfrastructureError::Config(format!("invalid MONGO_URL {}: {}", config.redacted_url(), e)))?;

    options.app_name = Some(config.app_name.clone().unwrap_or_else(|| DEFAULT_APP_NAME.to_string()));
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.server_selection_timeout());
    Ok(options)
}

/// Connect and ping; an unreachable server fails immediately
pub async fn connect(config: &DatabaseConfig) -> Result<MongoStore, InfrastructureError> {
    let options = client_options(config).await?;
    let client = Client::with_options(options).map_err(|e| InfrastructureError::Config(e.to_string()))?;
    let store = MongoStore::new(client, &config.name);

    if let Err(err) = store.ping().await {
        tracing::error!(
            url = %config.redacted_url(),
            database = %config.name,
            error = %err,
            event = "store_unreachable",
            "Document store ping failed"
        );
        return Err(err.into());
    }

    tracing::info!(
        url = %config.redacted_url(),
        database = %config.name,
        event = "store_connected",
        "Connected to document store"
    );
    Ok(store)
}
