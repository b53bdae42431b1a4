//! The worker generation handle.
//!
//! One `Worker` value per generation, constructed with its collaborators
//! (immutable config, bucket store, network) and exposing one method per
//! lifecycle event: `on_install`, `on_activate`, `on_fetch`, `on_message`.
//! The embedding host calls these instead of the implicit event-listener
//! dispatch a browser runtime would do.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use url::Url;

use shltr_client::{Network, ScopePolicy};
use shltr_core::{BucketStore, EntryKey, Error, WorkerConfig};

/// Lifecycle phases of one worker generation.
///
/// `Installed` doubles as the skip-waiting signal: the generation is ready
/// to replace the active one immediately. `Activated` means it has claimed
/// all open pages and stale buckets are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    New,
    Installed,
    Activated,
}

/// One versioned worker generation.
pub struct Worker<S, N> {
    pub(crate) config: Arc<WorkerConfig>,
    pub(crate) store: Arc<S>,
    pub(crate) network: Arc<N>,
    pub(crate) scope: ScopePolicy,
    pub(crate) base: Url,
    pub(crate) offline_key: EntryKey,
    pub(crate) phase: Mutex<Phase>,
    /// Signaled when a fire-and-forget background task (write-back or
    /// command trim) finishes. Consumed only by test builds.
    pub(crate) background_done: Arc<Notify>,
}

impl<S: BucketStore + 'static, N: Network> Worker<S, N> {
    /// Build a worker generation from validated configuration.
    pub fn new(config: WorkerConfig, store: S, network: N) -> Result<Self, Error> {
        let scope = ScopePolicy::from_config(&config)?;
        let base =
            Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let offline_url = base
            .join(&config.offline_path)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.offline_path)))?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            network: Arc::new(network),
            scope,
            base,
            offline_key: EntryKey::get(&offline_url),
            phase: Mutex::new(Phase::New),
            background_done: Arc::new(Notify::new()),
        })
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn network(&self) -> &N {
        &self.network
    }

    /// Wait for the next fire-and-forget background task to finish.
    ///
    /// The caller-visible API never blocks on background work; this
    /// signal exists so tests can await settlement.
    #[cfg(any(test, feature = "test-hooks"))]
    pub async fn background_settled(&self) {
        self.background_done.notified().await;
    }
}
