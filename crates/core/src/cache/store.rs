//! The bucket store capability.
//!
//! A keyed, insertion-ordered, asynchronous store of request -> response
//! entries, partitioned by bucket name. The worker is written against this
//! trait; `CacheDb` is the persistent implementation. Buckets exist
//! implicitly while they hold entries.

use async_trait::async_trait;

use crate::Error;
use crate::cache::entry::StoredResponse;
use crate::request::EntryKey;

#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Write one entry into `bucket`, replacing any existing entry for the
    /// same key in place (the entry keeps its insertion position).
    async fn put(&self, bucket: &str, key: &EntryKey, response: &StoredResponse) -> Result<(), Error>;

    /// Write a batch of entries into `bucket` in one transaction.
    /// All-or-nothing: if any write fails, none are committed.
    async fn put_all(&self, bucket: &str, entries: &[(EntryKey, StoredResponse)]) -> Result<(), Error>;

    /// Look up an entry in one bucket.
    async fn get(&self, bucket: &str, key: &EntryKey) -> Result<Option<StoredResponse>, Error>;

    /// Look up an entry across every bucket, oldest match first.
    async fn match_any(&self, key: &EntryKey) -> Result<Option<StoredResponse>, Error>;

    /// All keys in `bucket`, oldest (first-written) first.
    async fn keys(&self, bucket: &str) -> Result<Vec<EntryKey>, Error>;

    /// Delete one entry. Returns false if the key was already absent,
    /// which callers treat as a no-op rather than an error.
    async fn delete(&self, bucket: &str, key: &EntryKey) -> Result<bool, Error>;

    /// Names of every bucket currently holding entries.
    async fn list_buckets(&self) -> Result<Vec<String>, Error>;

    /// Drop a whole bucket. Returns the number of entries removed.
    async fn delete_bucket(&self, bucket: &str) -> Result<u64, Error>;
}
