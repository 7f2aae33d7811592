//! Asset store trait and record types.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A durably persisted asset.
#[derive(Debug, Clone)]
pub struct CachedAsset {
    /// Unique key: the network location or a logical name.
    pub identity: String,
    /// The complete asset bytes.
    pub data: Vec<u8>,
    /// When the record was inserted.
    pub inserted_at: DateTime<Utc>,
    /// Size of `data` in bytes. Stored redundantly so aggregate queries
    /// never have to load blobs.
    pub size_bytes: u64,
}

impl CachedAsset {
    /// Build a record for freshly downloaded bytes, stamped with the
    /// current time.
    pub fn new(identity: impl Into<String>, data: Vec<u8>) -> Self {
        let size_bytes = data.len() as u64;
        Self {
            identity: identity.into(),
            data,
            inserted_at: Utc::now(),
            size_bytes,
        }
    }
}

/// Blob-free projection of a [`CachedAsset`], for introspection callers that
/// must not pay the cost of loading full payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub identity: String,
    pub inserted_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Durable, crash-tolerant key-value persistence for binary assets.
///
/// At most one record exists per identity; writing an existing identity
/// replaces the prior record atomically. A `get` never observes a
/// half-written record. All operations are synchronous to match rusqlite's
/// API.
pub trait AssetStore: Send + Sync {
    /// Fetch the full record, or `Ok(None)` if the identity is absent.
    /// Absence is a normal state, never an error.
    fn get(&self, identity: &str) -> Result<Option<CachedAsset>>;

    /// Upsert a record. Replaces any existing record with the same identity.
    fn put(&self, asset: &CachedAsset) -> Result<()>;

    /// Remove a record if present. Returns whether one existed; absence is
    /// not an error.
    fn delete(&self, identity: &str) -> Result<bool>;

    /// Remove every record. Returns the number removed.
    fn delete_all(&self) -> Result<usize>;

    /// Metadata for all records, without their bytes. Order unspecified;
    /// callers sort by `inserted_at` if order matters.
    fn list_all(&self) -> Result<Vec<AssetSummary>>;

    /// Sum of `size_bytes` across all records. Computed from the live
    /// table, so it always agrees with [`AssetStore::list_all`].
    fn total_size(&self) -> Result<u64>;

    /// Whether a record exists for the identity. Pure query.
    fn contains(&self, identity: &str) -> Result<bool>;
}
