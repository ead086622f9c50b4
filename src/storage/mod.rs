//! Storage adapters
//!
//! The library never owns the storage medium. Everything goes through the
//! [`StorageAdapter`] trait, which mirrors the browser storage interface:
//! get, set, remove, key-by-index and length.

mod memory;
mod file;
mod default;

pub use memory::MemoryStorage;
pub use file::FileStorage;
pub use default::{clear_default_storage, default_storage, install_default_storage};

use crate::error::Result;
use std::ops::Deref;
use std::sync::Arc;

/// A key/value storage medium
///
/// Methods take `&self`: a storage medium is shared by every caller holding a
/// reference to it, so implementations handle their own interior mutability.
///
/// Index order only has to be stable for the duration of one enumeration
/// pass; it need not reflect insertion order.
pub trait StorageAdapter: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Create or overwrite `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`, no-op if absent
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Key at position `index`, or `None` past the end
    fn key(&self, index: usize) -> Option<String>;

    /// Number of stored items
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn key(&self, index: usize) -> Option<String> {
        (**self).key(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// An adapter reference that is either caller-supplied or the process default
pub(crate) enum Resolved<'a> {
    Borrowed(&'a dyn StorageAdapter),
    Default(Arc<dyn StorageAdapter>),
}

impl<'a> Deref for Resolved<'a> {
    type Target = dyn StorageAdapter + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Resolved::Borrowed(storage) => *storage,
            Resolved::Default(storage) => storage.as_ref(),
        }
    }
}

/// Use the supplied adapter, falling back to the process default.
///
/// The default is only looked up when no adapter was supplied.
pub(crate) fn resolve(storage: Option<&dyn StorageAdapter>) -> Result<Resolved<'_>> {
    match storage {
        Some(storage) => Ok(Resolved::Borrowed(storage)),
        None => default_storage().map(Resolved::Default),
    }
}
