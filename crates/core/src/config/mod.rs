//! Worker configuration with layered loading.
//!
//! Configuration management using figment for layered loading from
//! multiple sources:
//!
//! 1. Environment variables (SHLTR_*)
//! 2. TOML config file (if SHLTR_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The version identifier is derived externally (build metadata) and
//! injected here; the worker never recomputes it at runtime. Everything in
//! this module is immutable once loaded: components receive a shared
//! `WorkerConfig` at construction and there is no process-wide mutable
//! state.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::bucket::BucketKind;

mod validation;

pub use validation::ConfigError;

/// Ordered mapping of bucket kind to allowed third-party domains.
///
/// Consulted at routing time only, never mutated at runtime. Iteration
/// order is fixed: `remote` first, then `images` (declaration order). A
/// domain listed under both resolves to `remote`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Whitelist {
    #[serde(default)]
    pub remote: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,
}

impl Whitelist {
    fn sets(&self) -> [(BucketKind, &[String]); 2] {
        [(BucketKind::Remote, &self.remote), (BucketKind::Images, &self.images)]
    }

    /// Whether `domain` appears in any kind's list.
    pub fn contains(&self, domain: &str) -> bool {
        self.sets().iter().any(|(_, domains)| domains.iter().any(|d| d == domain))
    }

    /// The first kind whose list contains `domain`, under the fixed
    /// remote-then-images order.
    pub fn kind_for(&self, domain: &str) -> Option<BucketKind> {
        self.sets()
            .iter()
            .find(|(_, domains)| domains.iter().any(|d| d == domain))
            .map(|(kind, _)| *kind)
    }
}

/// Maximum entry count per bucket kind, enforced by trim passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimLimits {
    #[serde(default = "default_static_limit")]
    pub r#static: usize,

    #[serde(default = "default_remote_limit")]
    pub remote: usize,

    #[serde(default = "default_pages_limit")]
    pub pages: usize,

    #[serde(default = "default_images_limit")]
    pub images: usize,
}

fn default_static_limit() -> usize {
    50
}

fn default_remote_limit() -> usize {
    50
}

fn default_pages_limit() -> usize {
    100
}

fn default_images_limit() -> usize {
    150
}

impl Default for TrimLimits {
    fn default() -> Self {
        Self {
            r#static: default_static_limit(),
            remote: default_remote_limit(),
            pages: default_pages_limit(),
            images: default_images_limit(),
        }
    }
}

impl TrimLimits {
    pub fn for_kind(&self, kind: BucketKind) -> usize {
        match kind {
            BucketKind::Static => self.r#static,
            BucketKind::Remote => self.remote,
            BucketKind::Pages => self.pages,
            BucketKind::Images => self.images,
        }
    }

    /// The full trim table, one entry per bucket kind.
    pub fn table(&self) -> [(BucketKind, usize); 4] {
        [
            (BucketKind::Static, self.r#static),
            (BucketKind::Remote, self.remote),
            (BucketKind::Pages, self.pages),
            (BucketKind::Images, self.images),
        ]
    }
}

/// Worker configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHLTR_*)
/// 2. TOML config file (if SHLTR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Opaque short version identifier for this worker generation.
    ///
    /// Set via SHLTR_VERSION, typically injected by the build step (e.g. a
    /// 7-char content hash). Fixed for the generation's lifetime.
    #[serde(default = "default_version")]
    pub version: String,

    /// Site namespace, the middle segment of every bucket name.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Canonical base URL of the site; same-origin checks compare against
    /// this.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to the SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Ordered list of paths pre-warmed into the static bucket at install.
    /// All-or-nothing: one failed fetch abandons the whole install.
    #[serde(default = "default_static_manifest")]
    pub static_manifest: Vec<String>,

    /// Reserved path prefix routed to the static bucket.
    #[serde(default = "default_static_prefix")]
    pub static_prefix: String,

    /// Reserved staging/testing path prefix, never intercepted.
    #[serde(default = "default_staging_prefix")]
    pub staging_prefix: String,

    /// Path of the offline fallback page. Must be listed in
    /// `static_manifest` so it is guaranteed present after install.
    #[serde(default = "default_offline_path")]
    pub offline_path: String,

    /// Third-party domains eligible for interception and their buckets.
    #[serde(default = "default_whitelist")]
    pub whitelist: Whitelist,

    /// Per-bucket entry count bounds for trim passes.
    #[serde(default)]
    pub trim_limits: TrimLimits,

    /// User-Agent string for outgoing fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to accept per fetched response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Cookie header value attached to credentialed (install) fetches.
    ///
    /// Set via SHLTR_CREDENTIAL_COOKIE. There is no ambient cookie jar in
    /// this layer, so credential inclusion is explicit configuration.
    #[serde(default)]
    pub credential_cookie: Option<String>,
}

fn default_version() -> String {
    "dev".into()
}

fn default_namespace() -> String {
    "blog".into()
}

fn default_base_url() -> String {
    "https://site.example/".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shltr-cache.sqlite")
}

fn default_static_manifest() -> Vec<String> {
    [
        "/",
        "/assets/js/search.min.js",
        "/assets/js/highlight.min.js",
        "/assets/css/highlight.min.css",
        "/assets/css/stylesheet.min.css",
        "/assets/icons/favicon/32x32.png",
        "/search/",
        "/index.json",
        "/offline/",
        "/404.html",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_static_prefix() -> String {
    "/assets/".into()
}

fn default_staging_prefix() -> String {
    "/staging/".into()
}

fn default_offline_path() -> String {
    "/offline/".into()
}

fn default_whitelist() -> Whitelist {
    Whitelist {
        remote: vec!["unpkg.com".into()],
        images: vec!["i.creativecommons.org".into(), "i.imgur.com".into()],
    }
}

fn default_user_agent() -> String {
    "shltr/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            namespace: default_namespace(),
            base_url: default_base_url(),
            db_path: default_db_path(),
            static_manifest: default_static_manifest(),
            static_prefix: default_static_prefix(),
            staging_prefix: default_staging_prefix(),
            offline_path: default_offline_path(),
            whitelist: default_whitelist(),
            trim_limits: TrimLimits::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            credential_cookie: None,
        }
    }
}

impl WorkerConfig {
    /// Timeout as Duration for use with the HTTP client.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed canonical base URL.
    pub fn base(&self) -> Result<url::Url, ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "base_url".into(),
            reason: e.to_string(),
        })
    }

    /// Full bucket name for `kind` under this generation's version.
    pub fn bucket(&self, kind: BucketKind) -> String {
        crate::bucket::bucket_name(&self.version, &self.namespace, kind)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHLTR_`
    /// 2. TOML file from `SHLTR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHLTR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHLTR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.version, "dev");
        assert_eq!(config.namespace, "blog");
        assert_eq!(config.db_path, PathBuf::from("./shltr-cache.sqlite"));
        assert_eq!(config.static_prefix, "/assets/");
        assert_eq!(config.offline_path, "/offline/");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(config.credential_cookie.is_none());
        assert!(config.static_manifest.contains(&config.offline_path));
    }

    #[test]
    fn test_default_trim_limits() {
        let limits = TrimLimits::default();
        assert_eq!(limits.for_kind(BucketKind::Static), 50);
        assert_eq!(limits.for_kind(BucketKind::Remote), 50);
        assert_eq!(limits.for_kind(BucketKind::Pages), 100);
        assert_eq!(limits.for_kind(BucketKind::Images), 150);
        assert_eq!(limits.table().len(), 4);
    }

    #[test]
    fn test_bucket_names_carry_version_prefix() {
        let config = WorkerConfig { version: "a1b2c3d".into(), ..Default::default() };
        for kind in BucketKind::ALL {
            assert!(crate::bucket::is_live(&config.bucket(kind), "a1b2c3d"));
        }
        assert_eq!(config.bucket(BucketKind::Static), "a1b2c3d::blog::static");
    }

    #[test]
    fn test_whitelist_fixed_order() {
        // a domain listed under both kinds resolves to remote (first set)
        let whitelist = Whitelist {
            remote: vec!["cdn.example".into()],
            images: vec!["cdn.example".into(), "i.imgur.com".into()],
        };
        assert_eq!(whitelist.kind_for("cdn.example"), Some(BucketKind::Remote));
        assert_eq!(whitelist.kind_for("i.imgur.com"), Some(BucketKind::Images));
        assert_eq!(whitelist.kind_for("other.example"), None);
        assert!(whitelist.contains("i.imgur.com"));
        assert!(!whitelist.contains("other.example"));
    }

    #[test]
    fn test_timeout_duration() {
        let config = WorkerConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_base_parses() {
        let config = WorkerConfig::default();
        let base = config.base().unwrap();
        assert_eq!(base.host_str(), Some("site.example"));
    }
}
