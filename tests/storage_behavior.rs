//! End-to-end behavior through the public API, against both bundled adapters

use keyshelf::{
    filter_keys, get_items, get_json, get_with_ttl_at, has_item, remove_keys, set_item, set_json,
    set_with_ttl_at, update_item, update_items, FileStorage, KeyPattern, MemoryStorage,
    StorageAdapter, SyncPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const T0: i64 = 1_700_000_000_000;

struct TempJournal(PathBuf);

impl TempJournal {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("keyshelf_it_{}_{}.log", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        TempJournal(path)
    }

    fn open(&self) -> FileStorage {
        FileStorage::open(&self.0, SyncPolicy::Always).unwrap()
    }
}

impl Drop for TempJournal {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Cart {
    items: Vec<String>,
    total_cents: u64,
}

#[test]
fn test_filter_then_remove_with_pattern() {
    let storage = MemoryStorage::new();
    for key in ["a1", "a2", "b1"] {
        set_item(key, "v", Some(&storage)).unwrap();
    }

    let starts_with_a = KeyPattern::parse("a*");
    assert_eq!(
        filter_keys(starts_with_a.predicate(), Some(&storage)).unwrap(),
        vec!["a1", "a2"]
    );

    assert_eq!(remove_keys(|_| true, Some(&storage)).unwrap(), 3);
    assert_eq!(storage.len(), 0);
}

#[test]
fn test_ttl_lifecycle_on_file_storage() {
    let journal = TempJournal::new("ttl");

    {
        let storage = journal.open();
        set_with_ttl_at("otp", "123456", 1000, T0, Some(&storage)).unwrap();
        assert_eq!(
            get_with_ttl_at("otp", T0, Some(&storage)).unwrap().as_deref(),
            Some("123456")
        );
    }

    // Expired but never read: still present after a restart
    let storage = journal.open();
    assert!(storage.get_item("otp").is_some());

    // First read past expiry evicts, durably
    assert_eq!(get_with_ttl_at("otp", T0 + 1001, Some(&storage)).unwrap(), None);
    assert!(!has_item("otp", Some(&storage)).unwrap());
    drop(storage);

    let storage = journal.open();
    assert!(storage.is_empty());
}

#[test]
fn test_json_survives_restart() {
    let journal = TempJournal::new("json");
    let cart = Cart {
        items: vec!["apple".to_string(), "pear".to_string()],
        total_cents: 350,
    };

    {
        let storage = journal.open();
        set_json("cart", &cart, Some(&storage)).unwrap();
    }

    let storage = journal.open();
    let loaded: Option<Cart> = get_json("cart", Some(&storage)).unwrap();
    assert_eq!(loaded, Some(cart));
}

#[test]
fn test_corrupt_json_written_through_adapter() {
    let storage = MemoryStorage::new();
    storage.set_item("cart", "<html>").unwrap();

    let loaded: Option<Cart> = get_json("cart", Some(&storage)).unwrap();
    assert_eq!(loaded, None);
}

#[test]
fn test_bulk_update_and_read() {
    let storage = MemoryStorage::new();
    for key in ["hits:home", "hits:about", "config"] {
        set_item(key, "1", Some(&storage)).unwrap();
    }

    update_items(
        |key| key.starts_with("hits:"),
        |current| {
            let n: u64 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
            (n * 10).to_string()
        },
        Some(&storage),
    )
    .unwrap();
    update_item("hits:new", |current| current.unwrap_or_else(|| "init".to_string()), Some(&storage)).unwrap();

    let hits = get_items(|key| key.starts_with("hits:"), Some(&storage)).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits["hits:home"], "10");
    assert_eq!(hits["hits:about"], "10");
    assert_eq!(hits["hits:new"], "init");
    assert_eq!(storage.get_item("config").as_deref(), Some("1"));
}
