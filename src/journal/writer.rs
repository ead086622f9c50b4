//! Journal writer

use super::{LogRecord, SyncPolicy};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::warn;

/// Appends records to the journal file
///
/// Not synchronized: the owning `FileStorage` serializes access.
pub struct JournalWriter {
    file: File,
    sync_policy: SyncPolicy,
    last_sync: Instant,
    /// Length of the journal up to the last complete record
    len: u64,
}

impl JournalWriter {
    /// Open `path` for appending, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::from_file(file, sync_policy)
    }

    /// Truncate `path` and start a fresh journal
    pub fn create<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Self::from_file(file, sync_policy)
    }

    fn from_file(file: File, sync_policy: SyncPolicy) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(JournalWriter {
            file,
            sync_policy,
            last_sync: Instant::now(),
            len,
        })
    }

    /// Append a record
    ///
    /// On failure the journal is cut back to its length before the call, so
    /// a partial record never sits in front of later ones.
    pub fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        let bytes = record.to_bytes();
        if let Err(e) = self.write_and_sync(&bytes) {
            self.discard_partial();
            return Err(e);
        }
        self.len += bytes.len() as u64;
        Ok(())
    }

    fn write_and_sync(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;

        match self.sync_policy {
            SyncPolicy::Always => self.sync()?,
            SyncPolicy::EverySec => {
                if self.last_sync.elapsed() >= Duration::from_secs(1) {
                    self.sync()?;
                }
            }
            SyncPolicy::No => {}
        }

        Ok(())
    }

    /// Cut the file back to the last complete record
    fn discard_partial(&mut self) {
        if let Err(e) = self.file.set_len(self.len) {
            warn!("Failed to truncate journal to {} bytes: {}", self.len, e);
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()?;
        self.last_sync = Instant::now();
        Ok(())
    }
}
