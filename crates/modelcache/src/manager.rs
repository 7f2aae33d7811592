//! Cache manager - the single entry point coordinating download and
//! persistence.
//!
//! On a hit the stored bytes are returned with no network activity. On a
//! miss the resource is downloaded, persisted best-effort, and returned;
//! a failed store write never blocks delivery of downloaded bytes.

use crate::download::{Downloader, HttpDownloader, ProgressFn};
use crate::error::Result;
use crate::store::{AssetStore, AssetSummary, CachedAsset, SqliteStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates the durable store and the streaming downloader.
///
/// Both collaborators are injected, so tests can substitute fakes for
/// either side.
pub struct CacheManager {
    store: Arc<dyn AssetStore>,
    downloader: Arc<dyn Downloader>,
}

impl CacheManager {
    /// Create a manager over explicit store and downloader instances.
    pub fn new(store: Arc<dyn AssetStore>, downloader: Arc<dyn Downloader>) -> Self {
        Self { store, downloader }
    }

    /// Create a manager backed by a SQLite store at `db_path` and the
    /// default HTTP downloader.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = SqliteStore::open(db_path)?;
        let downloader = HttpDownloader::new()?;
        Ok(Self::new(Arc::new(store), Arc::new(downloader)))
    }

    /// Fetch a resource, using the cache if present, else download then
    /// store.
    ///
    /// Cache hits return immediately and never invoke `on_progress`.
    /// Download failures propagate unchanged and leave the store untouched.
    /// A failed store write is logged and swallowed; the downloaded bytes
    /// are returned regardless.
    pub async fn fetch_resource(
        &self,
        identity: &str,
        location: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<Vec<u8>> {
        if let Some(asset) = self.store.get(identity)? {
            debug!("Cache hit for '{}' ({} bytes)", identity, asset.size_bytes);
            return Ok(asset.data);
        }

        info!("Cache miss for '{}', downloading from {}", identity, location);
        let data = self.downloader.download(location, on_progress).await?;

        let asset = CachedAsset::new(identity, data);
        if let Err(e) = self.store.put(&asset) {
            // Persistence is an optimization, not a correctness requirement
            // of a single fetch.
            warn!(
                "Failed to persist '{}' ({} bytes), serving uncached: {}",
                identity, asset.size_bytes, e
            );
        }

        Ok(asset.data)
    }

    /// Whether a complete asset is stored for this identity. Pure query.
    pub fn is_cached(&self, identity: &str) -> Result<bool> {
        self.store.contains(identity)
    }

    /// Remove one cached asset. Idempotent.
    pub fn evict_one(&self, identity: &str) -> Result<()> {
        let existed = self.store.delete(identity)?;
        if existed {
            debug!("Evicted cached asset '{}'", identity);
        }
        Ok(())
    }

    /// Remove every cached asset. Idempotent.
    pub fn evict_all(&self) -> Result<()> {
        let removed = self.store.delete_all()?;
        info!("Evicted {} cached assets", removed);
        Ok(())
    }

    /// Total bytes held by the cache.
    pub fn cache_size(&self) -> Result<u64> {
        self.store.total_size()
    }

    /// Metadata for every cached asset, without payloads.
    pub fn cache_entries(&self) -> Result<Vec<AssetSummary>> {
        self.store.list_all()
    }
}
