//! Database library providing MongoDB connectivity and a connectivity probe
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction and the write/read/delete probe
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Examples
//!
//! ## Connecting
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017");
//! let client = connect_from_config(&config).await?;
//! ```
//!
//! ## Probing
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, ProbeTarget, probe_from_config};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017");
//! let target = ProbeTarget::new("appsense_users", "users");
//! let report = probe_from_config(&config, &target, |event| println!("{:?}", event)).await?;
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub mod url;

pub use url::{redact_url, username_from_url};
