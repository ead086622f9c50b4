//! Predicate-based bulk operations
//!
//! All of these are loops over one key enumeration. None of them is
//! transactional: an interrupted call leaves whatever it already did.

use crate::primitives::collect_keys;
use crate::error::Result;
use crate::storage::{resolve, StorageAdapter};
use std::collections::HashMap;
use tracing::debug;

/// Keys matching `predicate`, in index order
pub fn filter_keys<P>(predicate: P, storage: Option<&dyn StorageAdapter>) -> Result<Vec<String>>
where
    P: Fn(&str) -> bool,
{
    let storage = resolve(storage)?;
    Ok(matching_keys(&*storage, &predicate))
}

fn matching_keys<P>(storage: &dyn StorageAdapter, predicate: &P) -> Vec<String>
where
    P: Fn(&str) -> bool,
{
    collect_keys(storage)
        .into_iter()
        .filter(|key| predicate(key.as_str()))
        .collect()
}

/// Map of every matching key to its value
///
/// A key that disappears between enumeration and read is left out.
pub fn get_items<P>(
    predicate: P,
    storage: Option<&dyn StorageAdapter>,
) -> Result<HashMap<String, String>>
where
    P: Fn(&str) -> bool,
{
    let storage = resolve(storage)?;
    Ok(matching_keys(&*storage, &predicate)
        .into_iter()
        .filter_map(|key| storage.get_item(&key).map(|value| (key, value)))
        .collect())
}

/// Remove every matching key, returning how many were removed
///
/// The key list is materialized before the first removal, so index shifts
/// caused by removing cannot make the loop skip a key.
pub fn remove_keys<P>(predicate: P, storage: Option<&dyn StorageAdapter>) -> Result<usize>
where
    P: Fn(&str) -> bool,
{
    let storage = resolve(storage)?;
    let keys = matching_keys(&*storage, &predicate);
    for key in &keys {
        storage.remove_item(key)?;
    }

    debug!("Removed {} keys", keys.len());
    Ok(keys.len())
}

/// Apply `update` to every matching key, in index order
///
/// Each key is an independent read-modify-write; see [`crate::update_item`].
pub fn update_items<P, F>(
    predicate: P,
    update: F,
    storage: Option<&dyn StorageAdapter>,
) -> Result<()>
where
    P: Fn(&str) -> bool,
    F: Fn(Option<String>) -> String,
{
    let storage = resolve(storage)?;
    for key in matching_keys(&*storage, &predicate) {
        let current = storage.get_item(&key);
        storage.set_item(&key, &update(current))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{get_item, set_item};
    use crate::pattern::KeyPattern;
    use crate::storage::MemoryStorage;

    fn seeded() -> MemoryStorage {
        let storage = MemoryStorage::new();
        for (key, value) in [("a1", "x"), ("b1", "y"), ("a2", "z")] {
            storage.set_item(key, value).unwrap();
        }
        storage
    }

    #[test]
    fn test_filter_keys_keeps_index_order() {
        let storage = seeded();
        let keys = filter_keys(|key| key.starts_with('a'), Some(&storage)).unwrap();
        assert_eq!(keys, vec!["a1", "a2"]);
    }

    #[test]
    fn test_filter_keys_with_pattern() {
        let storage = seeded();
        let pattern = KeyPattern::parse("*1");
        let keys = filter_keys(pattern.predicate(), Some(&storage)).unwrap();
        assert_eq!(keys, vec!["a1", "b1"]);
    }

    #[test]
    fn test_get_items() {
        let storage = seeded();
        let items = get_items(|key| key.starts_with('a'), Some(&storage)).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items["a1"], "x");
        assert_eq!(items["a2"], "z");
    }

    /// Enumerates keys whose values are already gone when read
    struct VanishingStorage {
        inner: MemoryStorage,
    }

    impl StorageAdapter for VanishingStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            if key.ends_with(":gone") {
                return None;
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.inner.remove_item(key)
        }

        fn key(&self, index: usize) -> Option<String> {
            self.inner.key(index)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_get_items_skips_values_gone_before_read() {
        let storage = VanishingStorage { inner: seeded() };
        storage.set_item("a:gone", "stale").unwrap();

        let keys = filter_keys(|key| key.starts_with('a'), Some(&storage)).unwrap();
        assert_eq!(keys, vec!["a1", "a2", "a:gone"]);

        let items = get_items(|key| key.starts_with('a'), Some(&storage)).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items["a1"], "x");
        assert_eq!(items["a2"], "z");
        assert!(!items.contains_key("a:gone"));
    }

    #[test]
    fn test_remove_keys_all_empties_storage() {
        let storage = seeded();
        let removed = remove_keys(|_| true, Some(&storage)).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_remove_keys_survives_index_shifts() {
        // Adjacent matches: a live index walk would skip every second one
        let storage = MemoryStorage::new();
        for key in ["tmp:1", "tmp:2", "tmp:3", "keep", "tmp:4"] {
            storage.set_item(key, "v").unwrap();
        }

        let removed = remove_keys(|key| key.starts_with("tmp:"), Some(&storage)).unwrap();

        assert_eq!(removed, 4);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.key(0).as_deref(), Some("keep"));
    }

    #[test]
    fn test_update_items() {
        let storage = seeded();
        update_items(
            |key| key.starts_with('a'),
            |current| current.unwrap_or_default().to_uppercase(),
            Some(&storage),
        )
        .unwrap();

        assert_eq!(get_item("a1", Some(&storage)).unwrap().as_deref(), Some("X"));
        assert_eq!(get_item("a2", Some(&storage)).unwrap().as_deref(), Some("Z"));
        assert_eq!(get_item("b1", Some(&storage)).unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn test_no_matches() {
        let storage = seeded();
        assert!(filter_keys(|_| false, Some(&storage)).unwrap().is_empty());
        assert!(get_items(|_| false, Some(&storage)).unwrap().is_empty());
        assert_eq!(remove_keys(|_| false, Some(&storage)).unwrap(), 0);
        set_item("untouched", "1", Some(&storage)).unwrap();
        assert_eq!(storage.len(), 4);
    }
}
