//! Unified error types for shltr.
//!
//! Network-level fetch failures are expected and recovered by the
//! interception fallback path; they are carried as `HttpError` only while
//! crossing the network seam and never escape a handled fetch.

use tokio_rusqlite::rusqlite;

/// Unified error types for the shltr worker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty manifest path).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cache entry found where one was required.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport error (network failure, offline, non-success status).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetched response exceeded the configured size cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// A static manifest fetch failed; the whole install is abandoned.
    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(String),

    /// Lifecycle phase ordering violated (e.g. activate before install).
    #[error("LIFECYCLE: {0}")]
    Lifecycle(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("GET https://site.example/offline/".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("/offline/"));
    }

    #[test]
    fn test_install_failed_display() {
        let err = Error::InstallFailed("/assets/js/search.min.js: status 404".to_string());
        assert!(err.to_string().starts_with("INSTALL_FAILED"));
    }
}
