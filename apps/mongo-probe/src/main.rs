//! MongoDB connectivity probe
//!
//! Lists databases, then writes, reads back and deletes one marker document.
//! Exits 0 when every step passes and 1 otherwise.

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::probe_from_config;
use database::username_from_url;
use eyre::{Result, WrapErr};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};

mod config;
mod report;

use config::Config;
use report::Report;

#[derive(Parser, Debug)]
#[command(name = "mongo-probe", version)]
#[command(about = "Check MongoDB connectivity with a write/read/delete round-trip")]
struct Cli {
    /// Database to write the probe document into (default: $PROBE_DATABASE or appsense_users)
    #[arg(short, long)]
    database: Option<String>,

    /// Collection to write the probe document into (default: $PROBE_COLLECTION or users)
    #[arg(short, long)]
    collection: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    install_color_eyre();

    let cli = Cli::parse();
    init_tracing(&Environment::from_env());

    let mut report = Report::new(io::stdout());
    match run(cli, &mut report).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the probe passed; `Err` only for failures to write the report itself
async fn run<W: Write>(cli: Cli, report: &mut Report<W>) -> Result<bool> {
    let config = match Config::from_env() {
        Ok(config) => config.with_overrides(cli.database, cli.collection),
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            report
                .failed(&e, None, None)
                .wrap_err("Failed to write report")?;
            return Ok(false);
        }
    };

    info!(
        database = %config.target.database,
        collection = %config.target.collection,
        "Starting MongoDB connectivity probe"
    );
    report
        .started(&config.mongodb.redacted_url())
        .wrap_err("Failed to write report")?;

    let mut write_error = None;
    let outcome = probe_from_config(&config.mongodb, &config.target, |event| {
        if let Err(e) = report.event(&event) {
            write_error.get_or_insert(e);
        }
    })
    .await;

    if let Some(e) = write_error {
        return Err(e).wrap_err("Failed to write report");
    }

    match outcome {
        Ok(probe) => {
            info!(
                elapsed_ms = probe.elapsed.as_millis() as u64,
                "MongoDB connectivity probe passed"
            );
            report.passed().wrap_err("Failed to write report")?;
            Ok(true)
        }
        Err(e) => {
            error!(step = %e.step(), error = %e, "MongoDB connectivity probe failed");
            let username = username_from_url(config.mongodb.url());
            report
                .failed(&e, Some(e.step()), username.as_deref())
                .wrap_err("Failed to write report")?;
            Ok(false)
        }
    }
}
