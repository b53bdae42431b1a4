//! Request-to-bucket routing policy.
//!
//! Pure function over the immutable configuration: the same path, domain,
//! and config always yield the same bucket kind. Side-effect free.

use crate::bucket::BucketKind;
use crate::config::WorkerConfig;

/// Pick the bucket kind for a request's path and domain.
///
/// 1. Manifest paths and anything under the static prefix go to `static`.
/// 2. A whitelisted domain goes to the first kind whose list contains it,
///    iterating `remote` then `images`.
/// 3. A whitelisted domain no categorized list claims falls back to
///    `remote`.
/// 4. Everything else (same-origin, non-static content) goes to `pages`.
pub fn route(path: &str, domain: &str, config: &WorkerConfig) -> BucketKind {
    if config.static_manifest.iter().any(|p| p == path) || path.starts_with(&config.static_prefix) {
        return BucketKind::Static;
    }

    if config.whitelist.contains(domain) {
        return config.whitelist.kind_for(domain).unwrap_or(BucketKind::Remote);
    }

    BucketKind::Pages
}
