//! Configuration validation rules.
//!
//! Validation logic for `WorkerConfig` values after they have been loaded
//! from environment, file, or defaults.

use crate::bucket::SEPARATOR;
use crate::config::WorkerConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl WorkerConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `version` or `namespace` is empty or contains the bucket separator
    /// - `base_url` does not parse or has no host
    /// - `static_manifest` is empty or omits `offline_path`
    /// - any trim limit is 0
    /// - `timeout_ms` is outside [100ms, 5min] or `max_bytes` outside (0, 50MB]
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("version", &self.version), ("namespace", &self.namespace)] {
            if value.is_empty() {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must not be empty".into() });
            }
            if value.contains(SEPARATOR) {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: format!("must not contain the bucket separator {SEPARATOR:?}"),
                });
            }
        }

        let base = self.base()?;
        if base.host_str().is_none() {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must have a host".into() });
        }

        if self.static_manifest.is_empty() {
            return Err(ConfigError::Invalid {
                field: "static_manifest".into(),
                reason: "must list at least the offline fallback page".into(),
            });
        }
        if !self.static_manifest.contains(&self.offline_path) {
            return Err(ConfigError::Invalid {
                field: "offline_path".into(),
                reason: format!("{:?} must be listed in static_manifest so install guarantees it", self.offline_path),
            });
        }

        for (kind, limit) in self.trim_limits.table() {
            if limit == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("trim_limits.{kind}"),
                    reason: "must be greater than 0".into(),
                });
            }
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.whitelist.remote.is_empty() && self.whitelist.images.is_empty() {
            tracing::warn!("whitelist is empty; only same-origin requests will be intercepted");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = WorkerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_version() {
        let config = WorkerConfig { version: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "version"));
    }

    #[test]
    fn test_validate_version_with_separator() {
        let config = WorkerConfig { version: "a1::b2".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "version"));
    }

    #[test]
    fn test_validate_namespace_with_separator() {
        let config = WorkerConfig { namespace: "blog::prod".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "namespace"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = WorkerConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_manifest() {
        let config = WorkerConfig { static_manifest: Vec::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "static_manifest"));
    }

    #[test]
    fn test_validate_manifest_must_include_offline_page() {
        let config = WorkerConfig { static_manifest: vec!["/".into(), "/404.html".into()], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "offline_path"));
    }

    #[test]
    fn test_validate_zero_trim_limit() {
        let mut config = WorkerConfig::default();
        config.trim_limits.pages = 0;
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "trim_limits.pages"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = WorkerConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = WorkerConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = WorkerConfig { timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_bounds() {
        let config = WorkerConfig { max_bytes: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));

        let config = WorkerConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = WorkerConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
