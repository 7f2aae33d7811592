//! modelcache - durable cache and streaming downloader for large immutable
//! model assets.
//!
//! Given a request for a named resource, the cache manager guarantees the
//! resource is fetched at most once per distinct identity: on the first
//! request the bytes are streamed from the network with incremental progress
//! reporting and persisted durably; later requests are served from the local
//! store with no network activity.
//!
//! # Example
//!
//! ```rust,ignore
//! use modelcache::CacheManager;
//!
//! #[tokio::main]
//! async fn main() -> modelcache::Result<()> {
//!     let manager = CacheManager::open("/path/to/assets.sqlite")?;
//!
//!     let bytes = manager
//!         .fetch_resource(
//!             "kokoro-v1.0",
//!             "https://models.example.com/kokoro-v1.0.bin",
//!             Some(&|percent| println!("downloaded {:.1}%", percent)),
//!         )
//!         .await?;
//!     println!("Model ready: {} bytes", bytes.len());
//!
//!     // Second call is served from the cache, instantly and offline.
//!     let same = manager
//!         .fetch_resource("kokoro-v1.0", "https://models.example.com/kokoro-v1.0.bin", None)
//!         .await?;
//!     assert_eq!(bytes, same);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod manager;
pub mod store;

// Re-export commonly used types
pub use download::{Downloader, HttpDownloader, ProgressFn};
pub use error::{ModelCacheError, Result};
pub use format::format_bytes;
pub use manager::CacheManager;
pub use store::{AssetStore, AssetSummary, CachedAsset, SqliteStore};
