//! Store configuration: map sizing, write-buffer budget, codec choice.

use kgdb_core::limits::{MAP_GROW_STEP, SIZE_1GB};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one on-disk [`crate::KVStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory the mmap environment lives in.
    pub path: PathBuf,
    /// Initial mmap size in bytes.
    pub map_size: u64,
    /// Amount the map grows by on `CapacityError`'s single retry.
    pub map_grow_step: u64,
    /// Aggregate write-buffer byte budget before a forced flush.
    pub buff_limit: u64,
    /// Open the environment read-only; writes are rejected.
    pub readonly: bool,
}

impl StoreConfig {
    /// Build a config rooted at `path` with spec defaults.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            ..StoreConfig::default_values()
        }
    }

    fn default_values() -> Self {
        StoreConfig {
            path: PathBuf::from("."),
            map_size: 10 * SIZE_1GB,
            map_grow_step: MAP_GROW_STEP,
            buff_limit: SIZE_1GB,
            readonly: false,
        }
    }

    /// Small map size and buffer budget for fast on-disk tests.
    #[must_use]
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            map_size: 1 << 20,
            map_grow_step: 1 << 20,
            buff_limit: 4096,
            readonly: false,
        }
    }

    /// Load a config from a TOML file, falling back to defaults for any
    /// field the file omits.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file can't be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&text).map_err(ConfigError::Parse)
    }

    /// Open in read-only mode.
    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Override the write-buffer byte budget.
    #[must_use]
    pub fn with_buff_limit(mut self, buff_limit: u64) -> Self {
        self.buff_limit = buff_limit;
        self
    }
}

/// Errors loading a [`StoreConfig`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file: {0}")]
    Io(std::io::Error),
    /// The config file's TOML was malformed.
    #[error("could not parse config file: {0}")]
    Parse(toml::de::Error),
}
