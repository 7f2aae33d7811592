//! Error types for modelcache.
//!
//! Storage failures and download failures are kept strictly apart: download
//! errors always surface to the caller, while storage errors on the write
//! path are recoverable (the cache manager degrades to network-only
//! delivery). Absence from the store is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modelcache operations.
#[derive(Debug, Error)]
pub enum ModelCacheError {
    /// The durable store could not be opened or initialized.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// A read query against the durable store failed.
    #[error("Storage read failed: {message}")]
    StorageRead {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// A write against the durable store failed (quota, I/O).
    #[error("Storage write failed: {message}")]
    StorageWrite {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// The server answered with a non-success status. No retry is performed.
    #[error("Download of {url} failed with HTTP status {status}")]
    DownloadHttp { url: String, status: u16 },

    /// The transport failed before or while streaming the body. Partial
    /// bytes are discarded, never cached.
    #[error("Download of {url} failed: {message}")]
    DownloadStream {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for modelcache operations.
pub type Result<T> = std::result::Result<T, ModelCacheError>;

impl ModelCacheError {
    /// True for failures on the persistence path.
    ///
    /// The cache manager treats these as non-fatal to a single fetch.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ModelCacheError::StorageUnavailable { .. }
                | ModelCacheError::StorageRead { .. }
                | ModelCacheError::StorageWrite { .. }
        )
    }
}
