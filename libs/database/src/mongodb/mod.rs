//! MongoDB connector and connectivity probe
//!
//! Provides client construction from configuration and the write/read/delete probe.

mod config;
mod connector;
mod probe;

pub use config::MongoConfig;
pub use connector::{MongoError, client_from_config, connect_from_config};
pub use probe::{
    MARKER_FIELD, MARKER_VALUE, ProbeDocument, ProbeError, ProbeEvent, ProbeReport, ProbeStep,
    ProbeTarget, probe_from_config, run_probe,
};
