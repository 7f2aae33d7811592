//! Durable key-value persistence for downloaded assets.
//!
//! One logical table maps an opaque string identity to the complete asset
//! bytes plus metadata. Records are created once after a successful download,
//! never mutated in place, and removed only by explicit eviction.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{AssetStore, AssetSummary, CachedAsset};
