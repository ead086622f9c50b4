//! File-backed storage adapter

use super::{MemoryStorage, StorageAdapter};
use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::journal::{JournalReader, JournalWriter, LogRecord, RecordOp, SyncPolicy};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Durable key/value storage
///
/// Items live in a [`MemoryStorage`]; every mutation is appended to a journal
/// before it is applied, and the journal is replayed on open.
pub struct FileStorage {
    path: PathBuf,
    memory: MemoryStorage,
    writer: Mutex<JournalWriter>,
    sync_policy: SyncPolicy,
}

impl FileStorage {
    /// Open (or create) the journal at `path`
    pub fn open<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> Result<Self> {
        let path = path.as_ref();
        let memory = MemoryStorage::new();

        if path.exists() {
            let reader = JournalReader::load(path)?;
            info!("Loading journal from {:?} ({} bytes)", path, reader.size());
            let (records, valid_len) = reader.parse_records();
            let replayed = replay(&memory, &records)?;
            info!("Replayed {} journal records, {} keys live", replayed, memory.len());

            // Drop the torn tail so new records are not appended after garbage
            if valid_len < reader.size() {
                warn!("Truncating journal {:?} to {} bytes", path, valid_len);
                OpenOptions::new().write(true).open(path)?.set_len(valid_len as u64)?;
            }
        }

        let writer = JournalWriter::open(path, sync_policy)?;
        info!("Journal writer initialized at {:?}", path);

        Ok(FileStorage {
            path: path.to_path_buf(),
            memory,
            writer: Mutex::new(writer),
            sync_policy,
        })
    }

    /// Open using a resolved configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let path = config.path.as_ref().ok_or(StorageError::Unavailable)?;
        Self::open(path, config.sync_policy)
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.memory.used_bytes()
    }

    /// Remove every item
    pub fn clear(&self) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.append(&LogRecord::clear())?;
        self.memory.clear();
        Ok(())
    }

    /// Force the journal to disk
    pub fn sync(&self) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.sync()?;
        Ok(())
    }

    /// Rewrite the journal as one Set record per live key
    ///
    /// Returns the new journal size in bytes.
    pub fn compact(&self) -> Result<usize> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let tmp_path = self.path.with_extension("compact");
        let mut fresh = JournalWriter::create(&tmp_path, SyncPolicy::No)?;
        let mut size = 0;
        for (key, value) in self.memory.entries() {
            let record = LogRecord::set(&key, &value);
            size += record.to_bytes().len();
            fresh.append(&record)?;
        }
        fresh.sync()?;
        drop(fresh);

        std::fs::rename(&tmp_path, &self.path)?;
        *writer = JournalWriter::open(&self.path, self.sync_policy)?;

        debug!("Compacted journal {:?} to {} bytes", self.path, size);
        Ok(size)
    }
}

/// Apply journal records to `memory`, returning how many were applied
///
/// Every record must apply; a record that cannot fails the open rather than
/// leaving an older value live.
fn replay(memory: &MemoryStorage, records: &[LogRecord]) -> Result<usize> {
    for record in records {
        match record.op {
            RecordOp::Set => memory.set_item(&record.key, &record.value)?,
            RecordOp::Remove => memory.remove_item(&record.key)?,
            RecordOp::Clear => memory.clear(),
        }
    }
    Ok(records.len())
}

impl StorageAdapter for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.memory.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.append(&LogRecord::set(key, value))?;
        self.memory.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if self.memory.get_item(key).is_none() {
            return Ok(());
        }
        writer.append(&LogRecord::remove(key))?;
        self.memory.remove_item(key)
    }

    fn key(&self, index: usize) -> Option<String> {
        self.memory.key(index)
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}
