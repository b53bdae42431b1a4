//! Entry CRUD against the SQLite store.
//!
//! Implements `BucketStore` for `CacheDb`. Insertion order is the
//! AUTOINCREMENT `seq` column; an upsert keeps the existing row's seq so a
//! rewritten entry does not move to the back of the trim queue.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row};

use super::connection::CacheDb;
use super::entry::StoredResponse;
use super::store::BucketStore;
use crate::Error;
use crate::request::EntryKey;

const UPSERT_SQL: &str = "INSERT INTO entries (
        bucket, key_hash, method, url, status, content_type, headers_json, body, fetched_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(bucket, key_hash) DO UPDATE SET
        status = excluded.status,
        content_type = excluded.content_type,
        headers_json = excluded.headers_json,
        body = excluded.body,
        fetched_at = excluded.fetched_at";

fn row_to_response(row: &Row<'_>) -> rusqlite::Result<StoredResponse> {
    Ok(StoredResponse {
        status: row.get(0)?,
        content_type: row.get(1)?,
        headers_json: row.get(2)?,
        body: row.get(3)?,
        fetched_at: row.get(4)?,
    })
}

#[async_trait]
impl BucketStore for CacheDb {
    async fn put(&self, bucket: &str, key: &EntryKey, response: &StoredResponse) -> Result<(), Error> {
        let bucket = bucket.to_string();
        let key = key.clone();
        let response = response.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    UPSERT_SQL,
                    params![
                        &bucket,
                        key.id(),
                        &key.method,
                        &key.url,
                        response.status,
                        &response.content_type,
                        &response.headers_json,
                        &response.body,
                        &response.fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn put_all(&self, bucket: &str, entries: &[(EntryKey, StoredResponse)]) -> Result<(), Error> {
        let bucket = bucket.to_string();
        let entries = entries.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for (key, response) in &entries {
                    tx.execute(
                        UPSERT_SQL,
                        params![
                            &bucket,
                            key.id(),
                            &key.method,
                            &key.url,
                            response.status,
                            &response.content_type,
                            &response.headers_json,
                            &response.body,
                            &response.fetched_at,
                        ],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn get(&self, bucket: &str, key: &EntryKey) -> Result<Option<StoredResponse>, Error> {
        let bucket = bucket.to_string();
        let key_hash = key.id();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let result = conn.query_row(
                    "SELECT status, content_type, headers_json, body, fetched_at
                     FROM entries WHERE bucket = ?1 AND key_hash = ?2",
                    params![bucket, key_hash],
                    row_to_response,
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn match_any(&self, key: &EntryKey) -> Result<Option<StoredResponse>, Error> {
        let key_hash = key.id();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let result = conn.query_row(
                    "SELECT status, content_type, headers_json, body, fetched_at
                     FROM entries WHERE key_hash = ?1 ORDER BY seq ASC LIMIT 1",
                    params![key_hash],
                    row_to_response,
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self, bucket: &str) -> Result<Vec<EntryKey>, Error> {
        let bucket = bucket.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<EntryKey>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url FROM entries WHERE bucket = ?1 ORDER BY seq ASC",
                )?;
                let keys = stmt
                    .query_map(params![bucket], |row| {
                        Ok(EntryKey { method: row.get(0)?, url: row.get(1)? })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, bucket: &str, key: &EntryKey) -> Result<bool, Error> {
        let bucket = bucket.to_string();
        let key_hash = key.id();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute(
                    "DELETE FROM entries WHERE bucket = ?1 AND key_hash = ?2",
                    params![bucket, key_hash],
                )?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn list_buckets(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT bucket FROM entries ORDER BY bucket")?;
                let buckets = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(buckets)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<u64, Error> {
        let bucket = bucket.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let deleted = conn.execute("DELETE FROM entries WHERE bucket = ?1", params![bucket])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}
