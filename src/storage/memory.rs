//! In-memory storage adapter

use super::StorageAdapter;
use crate::error::{Result, StorageError};
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Type alias for our hash map with SipHasher
type ItemMap = HashMap<String, String, BuildHasherDefault<SipHasher13>>;

struct Inner {
    /// Key -> value
    items: ItemMap,

    /// Keys in insertion order, backs `key(index)`
    order: Vec<String>,

    /// Sum of key and value lengths in bytes
    used_bytes: usize,
}

/// In-process key/value storage
///
/// Behaves like browser storage: keys are indexed in insertion order and
/// removing a key shifts the index of every key after it. An optional quota
/// caps the total size of keys plus values.
pub struct MemoryStorage {
    inner: RwLock<Inner>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create an empty store with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStorage {
            inner: RwLock::new(Inner {
                items: HashMap::with_capacity_and_hasher(
                    capacity,
                    BuildHasherDefault::<SipHasher13>::default(),
                ),
                order: Vec::with_capacity(capacity),
                used_bytes: 0,
            }),
            quota: None,
        }
    }

    /// Create an empty store limited to `quota` bytes of keys and values
    pub fn with_quota(quota: usize) -> Self {
        let mut storage = Self::new();
        storage.quota = Some(quota);
        storage
    }

    /// Configured quota, if any
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.read().used_bytes
    }

    /// Remove every item
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.items.clear();
        inner.order.clear();
        inner.used_bytes = 0;
    }

    /// Snapshot of all items in index order
    pub fn entries(&self) -> Vec<(String, String)> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|key| inner.items.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Total usage after storing `value` under `key`
fn projected_usage(inner: &Inner, key: &str, value: &str) -> usize {
    let previous = inner
        .items
        .get(key)
        .map(|old| key.len() + old.len())
        .unwrap_or(0);
    inner.used_bytes - previous + key.len() + value.len()
}

impl StorageAdapter for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read().items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.write();
        let needed = projected_usage(&inner, key, value);

        if let Some(quota) = self.quota {
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        if inner.items.insert(key.to_string(), value.to_string()).is_none() {
            inner.order.push(key.to_string());
        }
        inner.used_bytes = needed;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut inner = self.write();
        if let Some(old) = inner.items.remove(key) {
            inner.used_bytes -= key.len() + old.len();
            if let Some(pos) = inner.order.iter().position(|k| k == key) {
                inner.order.remove(pos);
            }
        }
        Ok(())
    }

    fn key(&self, index: usize) -> Option<String> {
        self.read().order.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.read().order.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}
