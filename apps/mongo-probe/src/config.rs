//! Configuration for the connectivity probe

use core_config::{ConfigError, FromEnv, env_or_default};
use database::mongodb::{MongoConfig, ProbeTarget};

pub const DEFAULT_DATABASE: &str = "appsense_users";
pub const DEFAULT_COLLECTION: &str = "users";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub target: ProbeTarget,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - `MONGODB_URL` / `MONGO_URL` (required) plus the optional `MONGODB_*` settings
    /// - `PROBE_DATABASE` (default: `appsense_users`)
    /// - `PROBE_COLLECTION` (default: `users`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongodb = MongoConfig::from_env()?.or_app_name(env!("CARGO_PKG_NAME"));

        let target = ProbeTarget::new(
            env_or_default("PROBE_DATABASE", DEFAULT_DATABASE),
            env_or_default("PROBE_COLLECTION", DEFAULT_COLLECTION),
        );

        Ok(Self { mongodb, target })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, database: Option<String>, collection: Option<String>) -> Self {
        if let Some(database) = database {
            self.target.database = database;
        }
        if let Some(collection) = collection {
            self.target.collection = collection;
        }
        self
    }
}
