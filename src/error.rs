//! Error types
//!
//! "Absent" is never an error: reads that find nothing (unset, expired or
//! corrupt) return `Ok(None)`. Only the failures below reach the caller.

use thiserror::Error;

/// Errors surfaced by storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// No adapter was supplied and no default could be resolved
    #[error("default storage is not available; provide a storage adapter or set KEYSHELF_PATH")]
    Unavailable,

    /// The adapter refused a write because it would exceed its quota
    #[error("quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// A value could not be serialized to JSON (write path only)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure in a file-backed adapter
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Returns `true` if the adapter rejected a write for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_predicate() {
        let err = StorageError::QuotaExceeded {
            key: "k".to_string(),
            needed: 10,
            quota: 4,
        };
        assert!(err.is_quota_exceeded());
        assert!(!StorageError::Unavailable.is_quota_exceeded());
    }

    #[test]
    fn test_display_mentions_key() {
        let err = StorageError::QuotaExceeded {
            key: "big".to_string(),
            needed: 10,
            quota: 4,
        };
        assert!(err.to_string().contains("'big'"));
    }
}
