//! Bounded bucket trimming.
//!
//! Eviction is strictly insertion-order: the oldest entry goes first.
//! This is an eviction policy, not a correctness-critical one; overshoot
//! between trims is tolerable.

use tracing::debug;

use super::store::BucketStore;
use crate::Error;

/// Delete oldest entries until `bucket` holds at most `max_items`.
///
/// Re-reads the key list after every delete, so concurrent trims on the
/// same bucket interleave safely: both may observe "over limit" and issue
/// redundant deletes, and deleting an already-absent key is a no-op.
/// Returns the number of entries this pass actually deleted.
pub async fn trim_bucket<S: BucketStore + ?Sized>(store: &S, bucket: &str, max_items: usize) -> Result<u64, Error> {
    let mut deleted = 0u64;

    loop {
        let keys = store.keys(bucket).await?;
        if keys.len() <= max_items {
            break;
        }
        if store.delete(bucket, &keys[0]).await? {
            deleted += 1;
        }
    }

    if deleted > 0 {
        debug!(bucket, deleted, max_items, "trimmed bucket");
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::connection::CacheDb;
    use crate::cache::entry::StoredResponse;
    use crate::request::EntryKey;

    fn key(n: usize) -> EntryKey {
        EntryKey { method: "GET".to_string(), url: format!("https://site.example/post-{n}/") }
    }

    async fn fill(db: &CacheDb, bucket: &str, count: usize) {
        for n in 0..count {
            db.put(bucket, &key(n), &StoredResponse::html("p")).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_trim_bounds_entry_count() {
        let db = CacheDb::open_in_memory().await.unwrap();
        fill(&db, "v1::blog::pages", 7).await;

        let deleted = trim_bucket(&db, "v1::blog::pages", 4).await.unwrap();

        assert_eq!(deleted, 3);
        assert_eq!(db.keys("v1::blog::pages").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_trim_deletes_oldest_first() {
        let db = CacheDb::open_in_memory().await.unwrap();
        fill(&db, "v1::blog::pages", 5).await;

        trim_bucket(&db, "v1::blog::pages", 2).await.unwrap();

        let keys = db.keys("v1::blog::pages").await.unwrap();
        assert_eq!(keys, vec![key(3), key(4)]);
    }

    #[tokio::test]
    async fn test_trim_under_limit_is_noop() {
        let db = CacheDb::open_in_memory().await.unwrap();
        fill(&db, "v1::blog::pages", 3).await;

        let deleted = trim_bucket(&db, "v1::blog::pages", 10).await.unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(db.keys("v1::blog::pages").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_trim_missing_bucket_is_noop() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let deleted = trim_bucket(&db, "v1::blog::images", 5).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_concurrent_trims_converge() {
        let db = CacheDb::open_in_memory().await.unwrap();
        fill(&db, "v1::blog::pages", 20).await;

        let (a, b) = tokio::join!(
            trim_bucket(&db, "v1::blog::pages", 5),
            trim_bucket(&db, "v1::blog::pages", 5),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(db.keys("v1::blog::pages").await.unwrap().len(), 5);
    }
}
