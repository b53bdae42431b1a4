//! Test doubles shared across this crate's test modules.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use shltr_client::Network;
use shltr_core::{Error, PageRequest, StoredResponse};

/// In-memory network: serves canned responses by URL, fails on demand.
///
/// Unknown URLs get a default HTML page so install-style bulk fetches
/// succeed without per-path setup.
pub(crate) struct FakeNetwork {
    responses: Mutex<HashMap<String, StoredResponse>>,
    fail_urls: Mutex<HashSet<String>>,
    offline: AtomicBool,
    pub(crate) seen: Mutex<Vec<PageRequest>>,
}

impl FakeNetwork {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fail_urls: Mutex::new(HashSet::new()),
            offline: AtomicBool::new(false),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn serve(&self, url: &str, response: StoredResponse) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub(crate) fn fail(&self, url: &str) {
        self.fail_urls.lock().unwrap().insert(url.to_string());
    }

    pub(crate) fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn requests_seen(&self) -> Vec<PageRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &PageRequest) -> Result<StoredResponse, Error> {
        self.seen.lock().unwrap().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::HttpError("network error: offline".into()));
        }

        if self.fail_urls.lock().unwrap().contains(request.url.as_str()) {
            return Err(Error::HttpError("status 404".into()));
        }

        let canned = self.responses.lock().unwrap().get(request.url.as_str()).cloned();
        Ok(canned.unwrap_or_else(|| StoredResponse::html(&format!("served {}", request.url))))
    }
}
