//! Centralized configuration for modelcache.
//!
//! Constants for network behavior and the durable store layout.

use std::path::PathBuf;
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    /// Time allowed to establish a connection.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Time allowed for a complete transfer. Model assets are large, so this
    /// covers the whole streamed body, not just the headers.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
    pub const USER_AGENT: &'static str = "modelcache/0.1";
}

/// Durable store layout.
pub struct StoreConfig;

impl StoreConfig {
    pub const DB_FILE_NAME: &'static str = "assets.sqlite";
    pub const DATA_DIR_NAME: &'static str = ".modelcache";
}

/// Default database path under the user's home directory
/// (`~/.modelcache/assets.sqlite`), or `None` if no home directory is known.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(StoreConfig::DATA_DIR_NAME)
            .join(StoreConfig::DB_FILE_NAME)
    })
}
