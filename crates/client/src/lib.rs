//! Client code for shltr.
//!
//! This crate provides the HTTP fetch pipeline and the interception scope
//! filter shared by the worker.

pub mod fetch;
pub mod scope;

pub use fetch::{FetchClient, FetchConfig, Network};
pub use scope::ScopePolicy;
