//! Typed values stored as JSON text
//!
//! Writes fail fast on serialization errors. Reads do not: text that does
//! not parse as the requested type is logged and reported as absent.

use crate::error::Result;
use crate::storage::{resolve, StorageAdapter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

/// Serialize `value` and store it under `key`
pub fn set_json<T>(key: &str, value: &T, storage: Option<&dyn StorageAdapter>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let storage = resolve(storage)?;
    write_json(&*storage, key, value)
}

/// Read and deserialize `key`; `None` if unset or unparseable
pub fn get_json<T>(key: &str, storage: Option<&dyn StorageAdapter>) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let storage = resolve(storage)?;
    Ok(read_json(&*storage, key))
}

/// Read-modify-write of a JSON value
///
/// `update` sees `None` when the key is unset or holds unparseable text.
/// Not atomic, like [`crate::update_item`].
pub fn update_json<T, F>(key: &str, update: F, storage: Option<&dyn StorageAdapter>) -> Result<()>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(Option<T>) -> T,
{
    let storage = resolve(storage)?;
    let current = read_json(&*storage, key);
    write_json(&*storage, key, &update(current))
}

fn write_json<T>(storage: &dyn StorageAdapter, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value)?;
    storage.set_item(key, &text)
}

fn read_json<T>(storage: &dyn StorageAdapter, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let text = storage.get_item(key)?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Error parsing JSON for key \"{}\": {}", key, e);
            None
        }
    }
}
