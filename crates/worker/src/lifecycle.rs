//! Install and activate phases of a worker generation.

use tracing::{debug, info};

use shltr_client::Network;
use shltr_core::{BucketKind, BucketStore, Error, PageRequest, bucket};

use crate::worker::{Phase, Worker};

/// Result of a committed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Number of manifest entries warmed into the static bucket.
    pub entries: usize,
}

/// Result of a completed activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Stale bucket names that were purged.
    pub deleted: Vec<String>,
}

impl<S: BucketStore + 'static, N: Network> Worker<S, N> {
    /// Pre-warm the static manifest into this generation's static bucket.
    ///
    /// Every manifest path is fetched with credentials included. All or
    /// nothing: a single fetch failure abandons the install, nothing is
    /// committed, and the generation never becomes eligible to activate.
    /// On success the whole batch lands in one transaction and the
    /// generation is immediately ready to replace the active one, without
    /// waiting for existing clients to release it.
    pub async fn on_install(&self) -> Result<Installation, Error> {
        let mut entries = Vec::with_capacity(self.config.static_manifest.len());

        for path in &self.config.static_manifest {
            let url = self.base.join(path).map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;
            let request = PageRequest::get(url).with_credentials();
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("{path}: {e}")))?;
            entries.push((request.entry_key(), response));
        }

        let bucket = self.config.bucket(BucketKind::Static);
        self.store.put_all(&bucket, &entries).await?;

        self.set_phase(Phase::Installed);
        info!(bucket = %bucket, entries = entries.len(), "install committed, ready to take over");

        Ok(Installation { entries: entries.len() })
    }

    /// Purge every bucket left by other versions, then take control.
    ///
    /// Refuses to run before an install has committed. Enumeration or
    /// delete failures propagate and abort the activation.
    pub async fn on_activate(&self) -> Result<Activation, Error> {
        if self.phase() == Phase::New {
            return Err(Error::Lifecycle("activate before install completed".into()));
        }

        let prefix = bucket::live_prefix(&self.config.version);
        let mut deleted = Vec::new();

        for name in self.store.list_buckets().await? {
            if !name.starts_with(&prefix) {
                self.store.delete_bucket(&name).await?;
                debug!(bucket = %name, "purged stale bucket");
                deleted.push(name);
            }
        }

        self.set_phase(Phase::Activated);
        info!(version = %self.config.version, purged = deleted.len(), "activated, claiming all pages");

        Ok(Activation { deleted })
    }
}
