//! Single-key primitives and key enumeration
//!
//! Every function takes an optional adapter; `None` resolves the process
//! default (see [`crate::storage::default_storage`]).

use crate::error::Result;
use crate::storage::{resolve, StorageAdapter};

/// All currently set keys, in index order
///
/// Walks indices `0..len()` and skips any index the adapter reports as empty.
pub fn storage_keys(storage: Option<&dyn StorageAdapter>) -> Result<Vec<String>> {
    let storage = resolve(storage)?;
    Ok(collect_keys(&*storage))
}

pub(crate) fn collect_keys(storage: &dyn StorageAdapter) -> Vec<String> {
    (0..storage.len()).filter_map(|i| storage.key(i)).collect()
}

/// Whether `key` currently holds a value
pub fn has_item(key: &str, storage: Option<&dyn StorageAdapter>) -> Result<bool> {
    Ok(resolve(storage)?.get_item(key).is_some())
}

/// Read `key`; `None` if unset
pub fn get_item(key: &str, storage: Option<&dyn StorageAdapter>) -> Result<Option<String>> {
    Ok(resolve(storage)?.get_item(key))
}

/// Create or overwrite `key`
///
/// Adapter failures (quota, I/O) are returned unchanged.
pub fn set_item(key: &str, value: &str, storage: Option<&dyn StorageAdapter>) -> Result<()> {
    resolve(storage)?.set_item(key, value)
}

/// Read-modify-write of a single key
///
/// Not atomic: a concurrent writer between the read and the write is lost.
pub fn update_item<F>(key: &str, update: F, storage: Option<&dyn StorageAdapter>) -> Result<()>
where
    F: FnOnce(Option<String>) -> String,
{
    let storage = resolve(storage)?;
    let current = storage.get_item(key);
    storage.set_item(key, &update(current))
}

/// Delete `key`, no-op if absent
pub fn remove_item(key: &str, storage: Option<&dyn StorageAdapter>) -> Result<()> {
    resolve(storage)?.remove_item(key)
}
