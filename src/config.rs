//! Storage configuration
//!
//! Used to resolve the process-wide default adapter. Sources, later ones
//! overriding earlier ones:
//!
//! 1. `KEYSHELF_CONFIG`: path to a JSON file deserialized into [`StorageConfig`]
//! 2. `KEYSHELF_PATH`: journal file of the default `FileStorage`
//! 3. `KEYSHELF_SYNC`: `always`, `everysec` or `no`
//!
//! # Example
//!
//! ```rust
//! use keyshelf::{StorageConfig, SyncPolicy};
//!
//! let config = StorageConfig::new()
//!     .with_path("/tmp/app.keyshelf")
//!     .with_sync_policy(SyncPolicy::Always);
//! assert!(config.path.is_some());
//! ```

use crate::error::{Result, StorageError};
use crate::journal::SyncPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "KEYSHELF_CONFIG";
pub const ENV_PATH: &str = "KEYSHELF_PATH";
pub const ENV_SYNC: &str = "KEYSHELF_SYNC";

/// Configuration of the default storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Journal file; no path means no default storage is available
    pub path: Option<PathBuf>,
    /// Journal sync policy (default: every second)
    pub sync_policy: SyncPolicy,
}

impl StorageConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(|e| {
            StorageError::Config(format!("invalid config file {:?}: {}", path.as_ref(), e))
        })
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG) {
            Some(file) => Self::from_json_file(file)?,
            None => Self::default(),
        };

        if let Some(path) = lookup(ENV_PATH).filter(|p| !p.is_empty()) {
            config.path = Some(PathBuf::from(path));
        }

        if let Some(sync) = lookup(ENV_SYNC) {
            config.sync_policy = SyncPolicy::parse(&sync).ok_or_else(|| {
                StorageError::Config(format!("{} must be always, everysec or no, got '{}'", ENV_SYNC, sync))
            })?;
        }

        Ok(config)
    }
}
