//! Versioned cache bucket naming.
//!
//! Every bucket name composes the worker generation's version, the site
//! namespace, and a bucket kind: `<version>::<namespace>::<kind>`, e.g.
//! `a1b2c3d::blog::static`. A bucket is live iff its name starts with the
//! current `<version>::` prefix; everything else is a stale generation's
//! leftovers and is deleted at activation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the version, namespace, and kind segments.
pub const SEPARATOR: &str = "::";

/// The logical cache partitions a request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    /// Pre-warmed assets from the static manifest.
    Static,
    /// Whitelisted third-party domains with no dedicated bucket.
    Remote,
    /// Whitelisted image hosts.
    Images,
    /// Default bucket for same-origin page content.
    Pages,
}

impl BucketKind {
    /// All kinds, in trim-table order.
    pub const ALL: [BucketKind; 4] = [
        BucketKind::Static,
        BucketKind::Remote,
        BucketKind::Pages,
        BucketKind::Images,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKind::Static => "static",
            BucketKind::Remote => "remote",
            BucketKind::Images => "images",
            BucketKind::Pages => "pages",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compose the full bucket name for one generation's partition.
pub fn bucket_name(version: &str, namespace: &str, kind: BucketKind) -> String {
    format!("{version}{SEPARATOR}{namespace}{SEPARATOR}{kind}")
}

/// The prefix every live bucket name must carry.
///
/// Includes the trailing separator so that version `a1` does not claim
/// buckets of version `a1b`.
pub fn live_prefix(version: &str) -> String {
    format!("{version}{SEPARATOR}")
}

/// Whether `name` belongs to the generation identified by `version`.
pub fn is_live(name: &str, version: &str) -> bool {
    name.starts_with(&live_prefix(version))
}
