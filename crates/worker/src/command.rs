//! External command handling.
//!
//! A single message kind today: `{"command": "trimCaches"}`, no payload.
//! Commands are fire-and-forget: no acknowledgment or result reaches the
//! sender, and a failed trim is logged and swallowed.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use shltr_client::Network;
use shltr_core::{BucketStore, trim_bucket};

use crate::worker::Worker;

/// Command messages the worker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "command")]
pub enum CommandMessage {
    #[serde(rename = "trimCaches")]
    TrimCaches,
}

impl<S: BucketStore + 'static, N: Network> Worker<S, N> {
    /// Handle one external command.
    ///
    /// `trimCaches` runs the trimmer once per entry of the trim table, on
    /// this generation's buckets, in the background.
    pub fn on_message(&self, message: CommandMessage) {
        match message {
            CommandMessage::TrimCaches => {
                debug!("trim requested");

                let config = Arc::clone(&self.config);
                let store = Arc::clone(&self.store);
                let done = Arc::clone(&self.background_done);

                tokio::spawn(async move {
                    for (kind, limit) in config.trim_limits.table() {
                        let bucket = config.bucket(kind);
                        if let Err(err) = trim_bucket(store.as_ref(), &bucket, limit).await {
                            warn!(bucket = %bucket, %err, "trim failed");
                        }
                    }
                    done.notify_one();
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeNetwork;
    use shltr_core::{BucketKind, CacheDb, EntryKey, StoredResponse, TrimLimits, WorkerConfig};

    #[test]
    fn test_parse_trim_command() {
        let message: CommandMessage = serde_json::from_str(r#"{"command": "trimCaches"}"#).unwrap();
        assert_eq!(message, CommandMessage::TrimCaches);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<CommandMessage>(r#"{"command": "nukeCaches"}"#).is_err());
        assert!(serde_json::from_str::<CommandMessage>(r#"{"not": "a command"}"#).is_err());
    }

    #[tokio::test]
    async fn test_trim_command_bounds_every_bucket() {
        let config = WorkerConfig {
            trim_limits: TrimLimits { r#static: 2, remote: 2, pages: 3, images: 2 },
            ..Default::default()
        };
        let store = CacheDb::open_in_memory().await.unwrap();
        let w = Worker::new(config, store, FakeNetwork::new()).unwrap();

        for n in 0..8 {
            let key = EntryKey { method: "GET".into(), url: format!("https://site.example/post-{n}/") };
            w.store()
                .put(&w.config().bucket(BucketKind::Pages), &key, &StoredResponse::html("p"))
                .await
                .unwrap();
        }

        w.on_message(CommandMessage::TrimCaches);
        w.background_settled().await;

        let keys = w.store().keys(&w.config().bucket(BucketKind::Pages)).await.unwrap();
        assert_eq!(keys.len(), 3);
        // oldest entries went first
        assert_eq!(keys[0].url, "https://site.example/post-5/");
    }

    #[tokio::test]
    async fn test_trim_command_ignores_other_generations() {
        let store = CacheDb::open_in_memory().await.unwrap();
        let config = WorkerConfig {
            version: "a1b2c3d".into(),
            trim_limits: TrimLimits { r#static: 1, remote: 1, pages: 1, images: 1 },
            ..Default::default()
        };
        let w = Worker::new(config, store, FakeNetwork::new()).unwrap();

        for n in 0..4 {
            let key = EntryKey { method: "GET".into(), url: format!("https://site.example/old-{n}/") };
            w.store().put("0ld9e4f::blog::pages", &key, &StoredResponse::html("old")).await.unwrap();
        }

        w.on_message(CommandMessage::TrimCaches);
        w.background_settled().await;

        // stale buckets are activation's job, not the trimmer's
        assert_eq!(w.store().keys("0ld9e4f::blog::pages").await.unwrap().len(), 4);
    }
}
