//! keyshelf - typed, self-expiring key/value storage
//!
//! A thin layer over a browser-style storage adapter (get, set, remove,
//! key-by-index, length):
//! - `primitives`: single-key reads, writes and read-modify-write
//! - `bulk`: predicate-based filtering, reads, removals and updates
//! - `json`: serde values stored as JSON text
//! - `ttl`: values wrapped in an expiry envelope, evicted lazily on read
//!
//! Every operation takes `Option<&dyn StorageAdapter>`; `None` uses the
//! process-wide default resolved by [`default_storage`].

pub mod error;
pub mod config;
pub mod storage;
pub mod journal;
pub mod primitives;
pub mod bulk;
pub mod json;
pub mod ttl;
pub mod pattern;
pub mod hooks;
pub mod inspector;

/// Re-export commonly used types
pub use error::{Result, StorageError};
pub use config::StorageConfig;
pub use journal::SyncPolicy;
pub use storage::{
    clear_default_storage, default_storage, install_default_storage, FileStorage, MemoryStorage,
    StorageAdapter,
};
pub use primitives::{get_item, has_item, remove_item, set_item, storage_keys, update_item};
pub use bulk::{filter_keys, get_items, remove_keys, update_items};
pub use json::{get_json, set_json, update_json};
pub use ttl::{get_with_ttl, get_with_ttl_at, set_with_ttl, set_with_ttl_at, Envelope};
pub use pattern::KeyPattern;
pub use hooks::StorageCleanup;
