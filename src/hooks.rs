//! Lifecycle-bound cleanup
//!
//! A UI component typically wants "remove these keys when I appear, and again
//! whenever my inputs change". [`StorageCleanup`] models that lifecycle
//! without depending on any framework: call [`mount`](StorageCleanup::mount)
//! when the component mounts, the setters when its inputs change, and
//! [`unmount`](StorageCleanup::unmount) when it goes away.

use crate::bulk::remove_keys;
use crate::error::Result;
use crate::storage::StorageAdapter;
use std::sync::Arc;

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Runs [`remove_keys`] on mount and on every dependency change
pub struct StorageCleanup {
    predicate: Predicate,
    storage: Option<Arc<dyn StorageAdapter>>,
    mounted: bool,
}

impl StorageCleanup {
    /// `storage: None` uses the process default, resolved at each run
    pub fn new<P>(predicate: P, storage: Option<Arc<dyn StorageAdapter>>) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        StorageCleanup {
            predicate: Box::new(predicate),
            storage,
            mounted: false,
        }
    }

    /// Mount and run the cleanup, returning how many keys were removed
    pub fn mount(&mut self) -> Result<usize> {
        self.mounted = true;
        self.run()
    }

    /// Replace the predicate; re-runs the cleanup while mounted
    pub fn set_predicate<P>(&mut self, predicate: P) -> Result<usize>
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
        self.rerun()
    }

    /// Replace the adapter; re-runs the cleanup while mounted
    pub fn set_storage(&mut self, storage: Option<Arc<dyn StorageAdapter>>) -> Result<usize> {
        self.storage = storage;
        self.rerun()
    }

    /// Stop reacting to dependency changes
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn rerun(&self) -> Result<usize> {
        if self.mounted {
            self.run()
        } else {
            Ok(0)
        }
    }

    fn run(&self) -> Result<usize> {
        let storage = self.storage.as_deref();
        remove_keys(|key| (self.predicate)(key), storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn seeded() -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        for key in ["draft:1", "draft:2", "cache:a", "user"] {
            storage.set_item(key, "v").unwrap();
        }
        storage
    }

    #[test]
    fn test_nothing_happens_before_mount() {
        let storage = seeded();
        let mut cleanup = StorageCleanup::new(|key| key.starts_with("draft:"), Some(storage.clone()));

        assert_eq!(cleanup.set_predicate(|_| true).unwrap(), 0);
        assert_eq!(storage.len(), 4);
        assert!(!cleanup.is_mounted());
    }

    #[test]
    fn test_mount_runs_cleanup() {
        let storage = seeded();
        let mut cleanup = StorageCleanup::new(|key| key.starts_with("draft:"), Some(storage.clone()));

        assert_eq!(cleanup.mount().unwrap(), 2);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_dependency_change_reruns() {
        let storage = seeded();
        let mut cleanup = StorageCleanup::new(|key| key.starts_with("draft:"), Some(storage.clone()));
        cleanup.mount().unwrap();

        assert_eq!(cleanup.set_predicate(|key| key.starts_with("cache:")).unwrap(), 1);
        assert_eq!(storage.key(0).as_deref(), Some("user"));

        let other = seeded();
        assert_eq!(cleanup.set_storage(Some(other.clone())).unwrap(), 1);
        assert_eq!(other.len(), 3);
    }

    #[test]
    fn test_unmount_stops_reruns() {
        let storage = seeded();
        let mut cleanup = StorageCleanup::new(|key| key.starts_with("draft:"), Some(storage.clone()));
        cleanup.mount().unwrap();
        cleanup.unmount();

        assert_eq!(cleanup.set_predicate(|_| true).unwrap(), 0);
        assert_eq!(storage.len(), 2);
    }
}
