//! Journal reader

use super::LogRecord;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Loads and parses a journal file
pub struct JournalReader {
    data: Vec<u8>,
}

impl JournalReader {
    /// Load the whole journal into memory
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(JournalReader {
            data: fs::read(path)?,
        })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        JournalReader { data }
    }

    /// Parse records up to the first invalid one
    ///
    /// A corrupt or truncated record ends the journal: everything after it
    /// is ignored. Returns the records and the length of the valid prefix.
    pub fn parse_records(&self) -> (Vec<LogRecord>, usize) {
        let mut records = Vec::new();
        let mut pos = 0;

        while pos < self.data.len() {
            match LogRecord::from_bytes(&self.data[pos..]) {
                Ok((record, size)) => {
                    records.push(record);
                    pos += size;
                }
                Err(e) => {
                    warn!(
                        "Journal corrupt at byte {}: {}. {} records recovered, {} bytes ignored",
                        pos,
                        e,
                        records.len(),
                        self.data.len() - pos
                    );
                    return (records, pos);
                }
            }
        }

        info!("Journal loaded: {} records", records.len());
        (records, pos)
    }

    /// Size of the journal in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
