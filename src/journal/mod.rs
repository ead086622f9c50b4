//! Append-only journal
//!
//! Gives `FileStorage` durability by logging every mutation to disk before
//! it is applied. Records are checksummed so a torn tail is detected on load.

mod record;
mod writer;
mod reader;

pub use record::{LogRecord, RecordOp};
pub use writer::JournalWriter;
pub use reader::JournalReader;

use serde::Deserialize;

/// Journal sync policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Sync after every write (safest, slowest)
    Always,
    /// Sync every second (balanced)
    #[default]
    #[serde(alias = "everysecond")]
    EverySec,
    /// Let the OS decide when to sync (fastest, least safe)
    No,
}

impl SyncPolicy {
    /// Parse the names accepted in configuration
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Some(SyncPolicy::Always),
            "everysec" | "everysecond" => Some(SyncPolicy::EverySec),
            "no" => Some(SyncPolicy::No),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_policy() {
        assert_eq!(SyncPolicy::parse("Always"), Some(SyncPolicy::Always));
        assert_eq!(SyncPolicy::parse("everysec"), Some(SyncPolicy::EverySec));
        assert_eq!(SyncPolicy::parse("no"), Some(SyncPolicy::No));
        assert_eq!(SyncPolicy::parse("sometimes"), None);
    }

    #[test]
    fn test_deserialize_sync_policy() {
        let policy: SyncPolicy = serde_json::from_str("\"always\"").unwrap();
        assert_eq!(policy, SyncPolicy::Always);
        let policy: SyncPolicy = serde_json::from_str("\"everysecond\"").unwrap();
        assert_eq!(policy, SyncPolicy::EverySec);
    }
}
