#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_optional};

/// MongoDB connection configuration
///
/// Holds connection-level settings only; which database and collection to work
/// with is decided by the caller. Timeouts left as `None` keep the driver's
/// defaults.
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// // Manual construction
/// let config = MongoConfig::new("mongodb://localhost:27017").with_app_name("mongo-probe");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Default)]
pub struct MongoConfig {
    /// MongoDB connection URL (required)
    /// Format: mongodb[+srv]://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: Option<u64>,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: Option<u64>,
}

impl MongoConfig {
    /// Create a new MongoConfig from a connection string, with driver defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Set the application name only if none was configured
    pub fn or_app_name(mut self, app_name: impl Into<String>) -> Self {
        if self.app_name.is_none() {
            self.app_name = Some(app_name.into());
        }
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    pub fn with_server_selection_timeout(mut self, secs: u64) -> Self {
        self.server_selection_timeout_secs = Some(secs);
        self
    }

    /// Get a reference to the MongoDB URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL with its password masked, safe to print or log
    pub fn redacted_url(&self) -> String {
        crate::redact_url(&self.url)
    }
}

// Credentials live in the URL, so Debug must not print it verbatim.
impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("url", &self.redacted_url())
            .field("app_name", &self.app_name)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .finish()
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required) - MongoDB connection string
/// - `MONGODB_APP_NAME` (optional) - Application name for server logs
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (optional, default: driver default)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: driver default)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Try MONGODB_URL first, fall back to MONGO_URL
        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGO_URL"))
            .map_err(|_| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;

        Ok(Self {
            url,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            connect_timeout_secs: env_parse_optional("MONGODB_CONNECT_TIMEOUT_SECS")?,
            server_selection_timeout_secs: env_parse_optional(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            )?,
        })
    }
}
