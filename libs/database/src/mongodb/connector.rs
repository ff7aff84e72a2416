use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::{debug, info};

use super::MongoConfig;

/// Error type for MongoDB client construction
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Build a Client from a MongoConfig without talking to the cluster
///
/// Parsing resolves `mongodb+srv://` seed lists, so DNS errors surface here.
/// The driver connects lazily; the first operation is what proves reachability.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, client_from_config};
///
/// let config = MongoConfig::new("mongodb://localhost:27017");
/// let client = client_from_config(&config).await?;
/// ```
pub async fn client_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    debug!(url = %config.redacted_url(), "Building MongoDB client");

    let mut options = ClientOptions::parse(config.url()).await?;

    if let Some(secs) = config.connect_timeout_secs {
        options.connect_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(secs) = config.server_selection_timeout_secs {
        options.server_selection_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(Client::with_options(options)?)
}

/// Connect using a MongoConfig and verify the cluster answers
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
/// use core_config::FromEnv;
///
/// let config = MongoConfig::from_env()?;
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!("Attempting to connect to MongoDB at {}", config.redacted_url());

    let client = client_from_config(config).await?;

    // Verify connection by listing databases
    client
        .list_database_names()
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}
