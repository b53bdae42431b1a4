//! Stored response snapshots.

use serde::{Deserialize, Serialize};

/// A response snapshot as stored in a bucket.
///
/// Cloning is how the interceptor "duplicates" a response: the original is
/// returned to the caller unconsumed while the clone rides the
/// fire-and-forget write-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Response headers snapshotted as a JSON object, if captured.
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    /// RFC3339 timestamp of the originating fetch.
    pub fetched_at: String,
}

impl StoredResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            headers_json: None,
            body,
            fetched_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }

    /// Shorthand for an HTML page snapshot.
    pub fn html(body: &str) -> Self {
        Self::new(200, Some("text/html".to_string()), body.as_bytes().to_vec())
    }
}
