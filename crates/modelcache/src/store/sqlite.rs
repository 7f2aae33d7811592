//! SQLite-based asset store implementation.

use super::traits::{AssetStore, AssetSummary, CachedAsset};
use crate::error::{ModelCacheError, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-backed asset store.
///
/// One row per identity, with the insertion timestamp indexed for
/// chronological listing. Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    /// Database connection (wrapped for thread safety).
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the store at the specified database path.
    ///
    /// Creates the parent directory and schema if they don't exist.
    /// Reopening an existing database is idempotent and side-effect-free.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModelCacheError::Io {
                message: format!("Failed to create store directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn =
            Connection::open(db_path).map_err(|e| ModelCacheError::StorageUnavailable {
                message: format!("Failed to open asset database: {}", e),
                source: Some(e),
            })?;

        // WAL keeps readers unblocked while a blob write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| ModelCacheError::StorageUnavailable {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.init_schema()?;

        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                identity TEXT PRIMARY KEY,
                data BLOB NOT NULL,
                inserted_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            -- Chronological listing without loading blobs
            CREATE INDEX IF NOT EXISTS idx_assets_inserted_at
                ON assets(inserted_at);
            "#,
        )
        .map_err(|e| ModelCacheError::StorageUnavailable {
            message: format!("Failed to initialize asset schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ModelCacheError::StorageUnavailable {
                message: format!("Failed to lock database: {}", e),
                source: None,
            })
    }
}

/// Timestamps are persisted as integer epoch milliseconds.
fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}

impl AssetStore for SqliteStore {
    fn get(&self, identity: &str) -> Result<Option<CachedAsset>> {
        let conn = self.lock()?;

        let row: Option<(Vec<u8>, i64, i64)> = conn
            .query_row(
                "SELECT data, inserted_at, size_bytes FROM assets WHERE identity = ?1",
                params![identity],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| ModelCacheError::StorageRead {
                message: format!("Failed to query asset '{}': {}", identity, e),
                source: Some(e),
            })?;

        Ok(row.map(|(data, inserted_at, size_bytes)| CachedAsset {
            identity: identity.to_string(),
            data,
            inserted_at: timestamp_from_millis(inserted_at),
            size_bytes: size_bytes as u64,
        }))
    }

    fn put(&self, asset: &CachedAsset) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO assets (identity, data, inserted_at, size_bytes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                asset.identity,
                asset.data,
                asset.inserted_at.timestamp_millis(),
                asset.size_bytes as i64,
            ],
        )
        .map_err(|e| ModelCacheError::StorageWrite {
            message: format!("Failed to store asset '{}': {}", asset.identity, e),
            source: Some(e),
        })?;

        debug!(
            "Stored asset '{}' ({} bytes)",
            asset.identity, asset.size_bytes
        );

        Ok(())
    }

    fn delete(&self, identity: &str) -> Result<bool> {
        let conn = self.lock()?;

        let deleted = conn
            .execute("DELETE FROM assets WHERE identity = ?1", params![identity])
            .map_err(|e| ModelCacheError::StorageWrite {
                message: format!("Failed to delete asset '{}': {}", identity, e),
                source: Some(e),
            })?;

        Ok(deleted > 0)
    }

    fn delete_all(&self) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn
            .execute("DELETE FROM assets", [])
            .map_err(|e| ModelCacheError::StorageWrite {
                message: format!("Failed to clear asset store: {}", e),
                source: Some(e),
            })?;

        debug!("Cleared {} assets from store", deleted);

        Ok(deleted)
    }

    fn list_all(&self) -> Result<Vec<AssetSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT identity, inserted_at, size_bytes FROM assets")
            .map_err(|e| ModelCacheError::StorageRead {
                message: format!("Failed to prepare listing query: {}", e),
                source: Some(e),
            })?;

        let summaries: Vec<AssetSummary> = stmt
            .query_map([], |row| {
                let identity: String = row.get(0)?;
                let inserted_at: i64 = row.get(1)?;
                let size_bytes: i64 = row.get(2)?;
                Ok(AssetSummary {
                    identity,
                    inserted_at: timestamp_from_millis(inserted_at),
                    size_bytes: size_bytes as u64,
                })
            })
            .map_err(|e| ModelCacheError::StorageRead {
                message: format!("Failed to list assets: {}", e),
                source: Some(e),
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(summaries)
    }

    fn total_size(&self) -> Result<u64> {
        let conn = self.lock()?;

        let total: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(size_bytes), 0) FROM assets",
                [],
                |row| row.get(0),
            )
            .map_err(|e| ModelCacheError::StorageRead {
                message: format!("Failed to compute store size: {}", e),
                source: Some(e),
            })?;

        Ok(total as u64)
    }

    fn contains(&self, identity: &str) -> Result<bool> {
        let conn = self.lock()?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM assets WHERE identity = ?1 LIMIT 1",
                params![identity],
                |_| Ok(true),
            )
            .optional()
            .map_err(|e| ModelCacheError::StorageRead {
                message: format!("Failed to check asset '{}': {}", identity, e),
                source: Some(e),
            })?
            .unwrap_or(false);

        Ok(exists)
    }
}
