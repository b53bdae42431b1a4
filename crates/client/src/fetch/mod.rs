//! HTTP fetch pipeline.
//!
//! One network attempt per intercepted request, network-first: transport
//! failures are returned as errors for the caller's fallback path, never
//! retried here.
//!
//! ### Limits
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Timeout delegated to the HTTP client; no extra cancellation layer
//!
//! ### Credentials
//! A request with `Credentials::Include` carries the configured cookie
//! value (install-time manifest fetches); everything else goes bare.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, header};

use shltr_core::{Credentials, Error, PageRequest, StoredResponse, WorkerConfig};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "shltr/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Cookie header value for credentialed fetches.
    pub credential_cookie: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "shltr/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
            credential_cookie: None,
        }
    }
}

impl FetchConfig {
    /// Derive the fetch configuration from the worker configuration.
    pub fn from_worker(config: &WorkerConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            credential_cookie: config.credential_cookie.clone(),
            ..Default::default()
        }
    }
}

/// The network capability the worker fetches through.
///
/// Production uses `FetchClient`; tests substitute fakes that fail on
/// demand, since transport failure is a first-class input to the
/// interception protocol.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> Result<StoredResponse, Error>;
}

/// HTTP fetch client backed by reqwest.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Network for FetchClient {
    /// Fetch a request, returning a storable response snapshot.
    ///
    /// Any transport-level failure (offline included) and any non-success
    /// status surface as `HttpError`; the interception layer decides what
    /// to substitute.
    async fn fetch(&self, request: &PageRequest) -> Result<StoredResponse, Error> {
        let start = Instant::now();

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("unsupported method: {}", request.method)))?;

        let mut builder = self.http.request(method, request.url.clone());

        if let Some(accept) = &request.accept {
            builder = builder.header(header::ACCEPT, accept);
        }

        if request.credentials == Credentials::Include
            && let Some(cookie) = &self.config.credential_cookie
        {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("network error: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();

        let content_type = headers.get(header::CONTENT_TYPE.as_str()).cloned();

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            request.url,
            status,
            start.elapsed().as_millis(),
            bytes.len()
        );

        let mut stored = StoredResponse::new(status.as_u16(), content_type, bytes.to_vec());
        stored.headers_json = serde_json::to_string(&headers).ok();
        Ok(stored)
    }
}
