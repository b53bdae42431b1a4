//! Interception scope filter.
//!
//! Decides whether a request is handled by the worker at all. Everything
//! out of scope passes through to the network untouched, with no cache
//! involvement:
//!
//! - only GET requests
//! - only URLs without a query component
//! - only same-origin URLs, or hosts in the whitelist
//! - never the reserved staging path prefix

use url::Url;

use shltr_core::{Error, PageRequest, Whitelist, WorkerConfig};

/// Immutable scope policy, resolved once from the worker configuration.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    base: Url,
    whitelist: Whitelist,
    staging_prefix: String,
}

impl ScopePolicy {
    pub fn from_config(config: &WorkerConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        Ok(Self { base, whitelist: config.whitelist.clone(), staging_prefix: config.staging_prefix.clone() })
    }

    /// Whether the worker intercepts this request.
    pub fn allows(&self, request: &PageRequest) -> bool {
        if request.method != "GET" {
            return false;
        }

        if request.url.query().is_some() {
            return false;
        }

        let same_origin = request.url.origin() == self.base.origin();
        let whitelisted = request.url.host_str().is_some_and(|host| self.whitelist.contains(host));
        if !same_origin && !whitelisted {
            return false;
        }

        !request.url.path().starts_with(&self.staging_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ScopePolicy {
        ScopePolicy::from_config(&WorkerConfig::default()).unwrap()
    }

    fn get(url: &str) -> PageRequest {
        PageRequest::get_str(url).unwrap()
    }

    #[test]
    fn test_same_origin_get_in_scope() {
        assert!(policy().allows(&get("https://site.example/my-post/")));
    }

    #[test]
    fn test_query_string_never_intercepted() {
        assert!(!policy().allows(&get("https://site.example/search/?q=a")));
    }

    #[test]
    fn test_non_get_passes_through() {
        let mut request = get("https://site.example/comments/");
        request.method = "POST".into();
        assert!(!policy().allows(&request));
    }

    #[test]
    fn test_foreign_origin_passes_through() {
        assert!(!policy().allows(&get("https://evil.example/thing.js")));
    }

    #[test]
    fn test_whitelisted_host_in_scope() {
        assert!(policy().allows(&get("https://unpkg.com/some-lib@1/dist/lib.js")));
        assert!(policy().allows(&get("https://i.imgur.com/abc.png")));
    }

    #[test]
    fn test_staging_prefix_excluded() {
        assert!(!policy().allows(&get("https://site.example/staging/draft-post/")));
    }

    #[test]
    fn test_scheme_is_part_of_origin() {
        // http on an https site is a different origin and not whitelisted
        assert!(!policy().allows(&get("http://site.example/my-post/")));
    }
}
