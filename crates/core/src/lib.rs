//! Core types and shared functionality for shltr.
//!
//! This crate provides:
//! - Versioned bucket naming and the request-to-bucket router
//! - The bucket store capability with its SQLite implementation
//! - Bounded trimming
//! - Configuration and unified error types

pub mod bucket;
pub mod cache;
pub mod config;
pub mod error;
pub mod request;
pub mod route;

pub use bucket::{BucketKind, bucket_name, is_live, live_prefix};
pub use cache::{BucketStore, CacheDb, StoredResponse, trim_bucket};
pub use config::{TrimLimits, Whitelist, WorkerConfig};
pub use error::Error;
pub use request::{Credentials, EntryKey, PageRequest};
pub use route::route;
