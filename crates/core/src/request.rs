//! Request identity for cache keying.
//!
//! An entry is keyed by method + full URL, never the body. The stored key
//! id is a SHA-256 over both, so bucket tables stay narrow and key
//! comparison is a single string equality.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::Error;

/// Whether a fetch should carry the configured credential header.
///
/// Install-time manifest fetches always include credentials; intercepted
/// page fetches never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Omit,
    Include,
}

/// One request as seen by the interception layer.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub method: String,
    pub url: Url,
    /// Raw `Accept` header value, if the caller supplied one.
    pub accept: Option<String>,
    pub credentials: Credentials,
}

impl PageRequest {
    /// A plain GET for `url` with no Accept header.
    pub fn get(url: Url) -> Self {
        Self { method: "GET".to_string(), url, accept: None, credentials: Credentials::Omit }
    }

    /// Parse and normalize a raw URL string into a GET request.
    ///
    /// Normalization keeps cache identity consistent: trim whitespace,
    /// default the scheme to https, strip the fragment. Hosts are
    /// lowercased by the parser; the query survives (the interception
    /// scope filter rejects query'd requests later).
    pub fn get_str(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidUrl("empty URL".into()));
        }

        let with_scheme =
            if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

        let mut url = Url::parse(&with_scheme).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
        }

        url.set_fragment(None);

        Ok(Self::get(url))
    }

    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = Some(accept.to_string());
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.credentials = Credentials::Include;
        self
    }

    /// Whether the request declares it accepts an HTML response.
    ///
    /// Drives the offline-page fallback: only HTML navigations get the
    /// offline page substituted on a double miss.
    pub fn accepts_html(&self) -> bool {
        self.accept.as_deref().is_some_and(|a| a.contains("text/html"))
    }

    /// The normalized cache identity of this request.
    pub fn entry_key(&self) -> EntryKey {
        EntryKey { method: self.method.clone(), url: self.url.to_string() }
    }
}

/// Normalized request identity: method + full URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub method: String,
    pub url: String,
}

impl EntryKey {
    pub fn get(url: &Url) -> Self {
        Self { method: "GET".to_string(), url: url.to_string() }
    }

    /// Stable stored id for this key.
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.url.as_bytes());
        hex::encode(hasher.finalize())
    }
}
