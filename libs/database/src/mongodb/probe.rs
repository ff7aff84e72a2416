//! Write/read/delete connectivity probe
//!
//! The probe lists databases, inserts one marker document into the target
//! collection, reads it back and deletes it again. Steps run strictly in order
//! and the first failure ends the run.

use chrono::{SecondsFormat, Utc};
use mongodb::{
    Client, Collection,
    bson::{Bson, Document, doc},
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{MongoConfig, MongoError, client_from_config};

/// Marker field written into every probe document
pub const MARKER_FIELD: &str = "test";

/// Value of [`MARKER_FIELD`]
pub const MARKER_VALUE: &str = "connection";

/// A step of the probe, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProbeStep {
    #[strum(to_string = "connect")]
    Connect,
    #[strum(to_string = "list databases")]
    ListDatabases,
    #[strum(to_string = "write")]
    Write,
    #[strum(to_string = "read")]
    Read,
    #[strum(to_string = "cleanup")]
    Cleanup,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Connect(#[from] MongoError),

    /// Display is the driver message alone; the step is reported through [`ProbeError::step`].
    #[error("{source}")]
    Driver {
        step: ProbeStep,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("no document found for probe {probe_id}")]
    Missing { probe_id: Uuid },

    #[error("no document deleted for probe {probe_id}")]
    Residue { probe_id: Uuid },
}

impl ProbeError {
    fn driver(step: ProbeStep) -> impl FnOnce(mongodb::error::Error) -> Self {
        move |source| ProbeError::Driver { step, source }
    }

    /// The step at which the probe stopped
    pub fn step(&self) -> ProbeStep {
        match self {
            ProbeError::Connect(_) => ProbeStep::Connect,
            ProbeError::Driver { step, .. } => *step,
            ProbeError::Missing { .. } => ProbeStep::Read,
            ProbeError::Residue { .. } => ProbeStep::Cleanup,
        }
    }
}

/// Database and collection the probe writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub database: String,
    pub collection: String,
}

impl ProbeTarget {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// The ephemeral marker document
///
/// `probe_id` is unique per run so that reads and deletes only ever touch the
/// document this run inserted.
#[derive(Debug, Clone)]
pub struct ProbeDocument {
    pub probe_id: Uuid,
    pub timestamp: String,
}

impl ProbeDocument {
    pub fn new() -> Self {
        Self {
            probe_id: Uuid::new_v4(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// The BSON document to insert
    pub fn to_document(&self) -> Document {
        let mut document = self.filter();
        document.insert("timestamp", self.timestamp.as_str());
        document
    }

    /// Filter matching this run's document and nothing else
    pub fn filter(&self) -> Document {
        let mut filter = Document::new();
        filter.insert(MARKER_FIELD, MARKER_VALUE);
        filter.insert("probe_id", self.probe_id.to_string());
        filter
    }
}

impl Default for ProbeDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress notifications, emitted after each step succeeds
#[derive(Debug)]
pub enum ProbeEvent<'a> {
    DatabasesListed(&'a [String]),
    Written(&'a Bson),
    ReadBack(&'a Document),
    CleanedUp(u64),
}

/// Outcome of a successful probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub databases: Vec<String>,
    pub probe_id: Uuid,
    pub inserted_id: Bson,
    pub read_back: Document,
    pub deleted_count: u64,
    pub elapsed: Duration,
}

/// Build a client from `config` and run the probe against it
///
/// Any connection-string or client-construction failure is reported as
/// [`ProbeStep::Connect`].
pub async fn probe_from_config<F>(
    config: &MongoConfig,
    target: &ProbeTarget,
    on_event: F,
) -> Result<ProbeReport, ProbeError>
where
    F: FnMut(ProbeEvent<'_>),
{
    let client = client_from_config(config).await?;
    run_probe(&client, target, on_event).await
}

/// Run list → write → read → cleanup against an existing client
#[instrument(skip(client, on_event), fields(database = %target.database, collection = %target.collection))]
pub async fn run_probe<F>(
    client: &Client,
    target: &ProbeTarget,
    mut on_event: F,
) -> Result<ProbeReport, ProbeError>
where
    F: FnMut(ProbeEvent<'_>),
{
    let start = Instant::now();

    let databases = client
        .list_database_names()
        .await
        .map_err(ProbeError::driver(ProbeStep::ListDatabases))?;
    debug!(count = databases.len(), "Listed databases");
    on_event(ProbeEvent::DatabasesListed(&databases));

    let collection = client
        .database(&target.database)
        .collection::<Document>(&target.collection);

    let probe = ProbeDocument::new();
    let inserted_id = collection
        .insert_one(probe.to_document())
        .await
        .map_err(ProbeError::driver(ProbeStep::Write))?
        .inserted_id;
    debug!(probe_id = %probe.probe_id, inserted_id = %inserted_id, "Probe document written");
    on_event(ProbeEvent::Written(&inserted_id));

    let read_back = match collection.find_one(probe.filter()).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            discard(&collection, &inserted_id).await;
            return Err(ProbeError::Missing {
                probe_id: probe.probe_id,
            });
        }
        Err(source) => {
            discard(&collection, &inserted_id).await;
            return Err(ProbeError::Driver {
                step: ProbeStep::Read,
                source,
            });
        }
    };
    debug!(probe_id = %probe.probe_id, "Probe document read back");
    on_event(ProbeEvent::ReadBack(&read_back));

    let deleted_count = collection
        .delete_one(doc! { "_id": inserted_id.clone() })
        .await
        .map_err(ProbeError::driver(ProbeStep::Cleanup))?
        .deleted_count;
    if deleted_count == 0 {
        return Err(ProbeError::Residue {
            probe_id: probe.probe_id,
        });
    }
    on_event(ProbeEvent::CleanedUp(deleted_count));

    let elapsed = start.elapsed();
    info!(
        probe_id = %probe.probe_id,
        elapsed_ms = elapsed.as_millis() as u64,
        "Probe completed"
    );

    Ok(ProbeReport {
        databases,
        probe_id: probe.probe_id,
        inserted_id,
        read_back,
        deleted_count,
        elapsed,
    })
}

/// Best-effort removal of the probe document after a failed read
async fn discard(collection: &Collection<Document>, inserted_id: &Bson) {
    if let Err(e) = collection.delete_one(doc! { "_id": inserted_id.clone() }).await {
        warn!(inserted_id = %inserted_id, error = %e, "Failed to remove probe document after read failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_document_shape() {
        let probe = ProbeDocument::new();
        let document = probe.to_document();

        assert_eq!(document.get_str(MARKER_FIELD).unwrap(), MARKER_VALUE);
        assert_eq!(
            document.get_str("probe_id").unwrap(),
            probe.probe_id.to_string()
        );
        assert_eq!(document.get_str("timestamp").unwrap(), probe.timestamp);
        assert!(!document.contains_key("_id"));
    }

    #[test]
    fn test_probe_timestamp_is_rfc3339_utc() {
        let probe = ProbeDocument::new();
        assert!(chrono::DateTime::parse_from_rfc3339(&probe.timestamp).is_ok());
        assert!(probe.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_probe_filter_excludes_timestamp() {
        let probe = ProbeDocument::new();
        let filter = probe.filter();
        assert_eq!(filter.len(), 2);
        assert!(filter.contains_key(MARKER_FIELD));
        assert!(filter.contains_key("probe_id"));
    }

    #[test]
    fn test_probe_ids_are_unique() {
        assert_ne!(ProbeDocument::new().probe_id, ProbeDocument::new().probe_id);
    }

    #[test]
    fn test_probe_step_display() {
        assert_eq!(ProbeStep::Connect.to_string(), "connect");
        assert_eq!(ProbeStep::ListDatabases.to_string(), "list databases");
        assert_eq!(ProbeStep::Cleanup.to_string(), "cleanup");
    }

    #[test]
    fn test_probe_error_step() {
        let probe_id = Uuid::new_v4();
        assert_eq!(ProbeError::Missing { probe_id }.step(), ProbeStep::Read);
        assert_eq!(ProbeError::Residue { probe_id }.step(), ProbeStep::Cleanup);
        assert_eq!(
            ProbeError::Connect(MongoError::ConnectionFailed("down".into())).step(),
            ProbeStep::Connect
        );
    }

    #[test]
    fn test_driver_error_display_omits_step_name() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ProbeError::Driver {
            step: ProbeStep::ListDatabases,
            source: io.into(),
        };
        assert_eq!(err.step(), ProbeStep::ListDatabases);
        assert!(!err.to_string().contains("list databases"));

        let probe_id = Uuid::new_v4();
        assert!(!ProbeError::Missing { probe_id }.to_string().contains("read"));
        assert!(!ProbeError::Residue { probe_id }.to_string().contains("cleanup"));
    }

    #[tokio::test]
    async fn test_probe_unreachable_fails_at_list() {
        let config = MongoConfig::new("mongodb://127.0.0.1:1")
            .with_connect_timeout(1)
            .with_server_selection_timeout(1);
        let target = ProbeTarget::new("probe_db", "probe_coll");

        let mut events = 0;
        let result = probe_from_config(&config, &target, |_| events += 1).await;

        let err = result.expect_err("probe against a closed port must fail");
        assert_eq!(err.step(), ProbeStep::ListDatabases);
        assert_eq!(events, 0);
    }

    #[tokio::test]
    async fn test_probe_malformed_url_fails_at_connect() {
        let config = MongoConfig::new("not-a-mongodb-url");
        let target = ProbeTarget::new("probe_db", "probe_coll");

        let result = probe_from_config(&config, &target, |_| {}).await;

        assert_eq!(result.unwrap_err().step(), ProbeStep::Connect);
    }
}
