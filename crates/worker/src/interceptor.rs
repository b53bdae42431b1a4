//! Per-request interception protocol.
//!
//! Network first, cache second, offline page last (HTML only). The cache
//! write-back after a network success is fire-and-forget: the response is
//! returned before the write lands, and an immediate re-read may observe a
//! stale or missing entry.

use std::sync::Arc;

use tracing::{debug, warn};

use shltr_client::Network;
use shltr_core::{BucketStore, Error, PageRequest, StoredResponse, route};

use crate::worker::Worker;

/// What interception resolved a request to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Out of scope; the caller forwards the request untouched.
    Skipped,
    /// The network answered; a copy is being written back in the
    /// background.
    FromNetwork(StoredResponse),
    /// The network failed; served from a cached entry.
    FromCache(StoredResponse),
    /// The network failed with nothing cached for an HTML navigation;
    /// served the offline page.
    OfflineFallback(StoredResponse),
    /// The network failed, nothing cached, not an HTML navigation: the
    /// original failure stands and no substitute is produced.
    Unavailable,
}

impl<S: BucketStore + 'static, N: Network> Worker<S, N> {
    /// Handle one intercepted request.
    ///
    /// Network fetch failures are expected here and always recovered into
    /// a fallback outcome; store failures during the fallback lookup
    /// propagate.
    pub async fn on_fetch(&self, request: &PageRequest) -> Result<FetchOutcome, Error> {
        if !self.scope.allows(request) {
            return Ok(FetchOutcome::Skipped);
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                self.spawn_write_back(request, response.clone());
                Ok(FetchOutcome::FromNetwork(response))
            }
            Err(err) => {
                debug!(url = %request.url, %err, "network failed, falling back to cache");
                self.fallback(request).await
            }
        }
    }

    /// Route the duplicate and stash it, without blocking the caller.
    fn spawn_write_back(&self, request: &PageRequest, copy: StoredResponse) {
        let kind = route(request.url.path(), request.url.host_str().unwrap_or(""), &self.config);
        let bucket = self.config.bucket(kind);
        let key = request.entry_key();
        let store = Arc::clone(&self.store);
        let done = Arc::clone(&self.background_done);

        tokio::spawn(async move {
            if let Err(err) = store.put(&bucket, &key, &copy).await {
                warn!(bucket = %bucket, url = %key.url, %err, "write-back failed");
            }
            done.notify_one();
        });
    }

    async fn fallback(&self, request: &PageRequest) -> Result<FetchOutcome, Error> {
        if let Some(hit) = self.store.match_any(&request.entry_key()).await? {
            return Ok(FetchOutcome::FromCache(hit));
        }

        if request.accepts_html() {
            let offline = self
                .store
                .match_any(&self.offline_key)
                .await?
                .ok_or_else(|| Error::CacheMiss(format!("offline page {} not cached", self.config.offline_path)))?;
            return Ok(FetchOutcome::OfflineFallback(offline));
        }

        Ok(FetchOutcome::Unavailable)
    }
}
