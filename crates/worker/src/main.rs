//! shltr worker entry point.
//!
//! Boots one worker generation: install, activate, then command messages
//! as JSON lines on stdin until EOF. Logging goes to stderr as JSON so
//! stdout stays free for the embedding host.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use shltr_client::{FetchClient, FetchConfig};
use shltr_core::{CacheDb, WorkerConfig};
use shltr_worker::{CommandMessage, Worker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = WorkerConfig::load()?;
    tracing::info!(version = %config.version, namespace = %config.namespace, "starting shltr worker generation");

    let store = CacheDb::open(&config.db_path).await?;
    let network = FetchClient::new(FetchConfig::from_worker(&config))?;
    let worker = Worker::new(config, store, network)?;

    let installed = worker.on_install().await?;
    tracing::info!(entries = installed.entries, "static bucket warmed");

    let activation = worker.on_activate().await?;
    tracing::info!(purged = activation.deleted.len(), "worker generation active");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CommandMessage>(&line) {
            Ok(message) => worker.on_message(message),
            Err(err) => tracing::warn!(%err, "ignoring unrecognized command"),
        }
    }

    Ok(())
}
