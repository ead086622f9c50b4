//! Process-wide default storage
//!
//! Resolved lazily on first use, then cached. Until something is cached,
//! every call re-runs resolution, so a failed lookup can succeed later once
//! the environment is fixed.

use super::{FileStorage, StorageAdapter};
use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

static DEFAULT_STORAGE: RwLock<Option<Arc<dyn StorageAdapter>>> = RwLock::new(None);

/// Use `storage` whenever an operation is called without an adapter
pub fn install_default_storage(storage: Arc<dyn StorageAdapter>) {
    *DEFAULT_STORAGE.write().unwrap_or_else(PoisonError::into_inner) = Some(storage);
}

/// Forget the cached default
pub fn clear_default_storage() {
    *DEFAULT_STORAGE.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Resolve the process-wide default storage
///
/// Returns the installed or previously resolved adapter. Otherwise opens the
/// `FileStorage` named by the environment configuration. Fails with
/// [`StorageError::Unavailable`] when nothing is configured; an in-memory
/// store is never substituted.
pub fn default_storage() -> Result<Arc<dyn StorageAdapter>> {
    if let Some(storage) = DEFAULT_STORAGE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Ok(Arc::clone(storage));
    }

    let mut slot = DEFAULT_STORAGE.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(storage) = slot.as_ref() {
        return Ok(Arc::clone(storage));
    }

    let config = StorageConfig::from_env()?;
    if config.path.is_none() {
        return Err(StorageError::Unavailable);
    }

    let storage: Arc<dyn StorageAdapter> = Arc::new(FileStorage::from_config(&config)?);
    info!("Default storage resolved from environment: {:?}", config.path);
    *slot = Some(Arc::clone(&storage));
    Ok(storage)
}
