//! Journal record format
//!
//! Binary format: [op(u8)] [timestamp(u64)] [key_len(u32)] [key] [value_len(u32)] [value] [checksum(u64)]
//!
//! All integers are little-endian. The checksum is the xxhash64 (seed 0) of
//! every preceding byte of the record.

use bytes::{Buf, BufMut, BytesMut};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed overhead: op + timestamp + two lengths + checksum
const HEADER_LEN: usize = 1 + 8 + 4 + 4 + 8;

/// Journaled mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordOp {
    /// set_item
    Set = 1,
    /// remove_item
    Remove = 2,
    /// clear
    Clear = 3,
}

impl RecordOp {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(RecordOp::Set),
            2 => Some(RecordOp::Remove),
            3 => Some(RecordOp::Clear),
            _ => None,
        }
    }
}

/// One journaled mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub op: RecordOp,
    /// Milliseconds since UNIX epoch
    pub timestamp: u64,
    pub key: String,
    /// Empty for Remove and Clear
    pub value: String,
}

impl LogRecord {
    pub fn set(key: &str, value: &str) -> Self {
        Self::new(RecordOp::Set, key, value)
    }

    pub fn remove(key: &str) -> Self {
        Self::new(RecordOp::Remove, key, "")
    }

    pub fn clear() -> Self {
        Self::new(RecordOp::Clear, "", "")
    }

    fn new(op: RecordOp, key: &str, value: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        LogRecord {
            op,
            timestamp,
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Serialize to bytes with checksum
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.key.len() + self.value.len());

        buf.put_u8(self.op as u8);
        buf.put_u64_le(self.timestamp);
        buf.put_u32_le(self.key.len() as u32);
        buf.put_slice(self.key.as_bytes());
        buf.put_u32_le(self.value.len() as u32);
        buf.put_slice(self.value.as_bytes());

        let checksum = xxhash_rust::xxh64::xxh64(&buf, 0);
        buf.put_u64_le(checksum);

        buf
    }

    /// Deserialize one record from the front of `data`
    ///
    /// Returns the record and the number of bytes it occupied.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), String> {
        if data.len() < HEADER_LEN {
            return Err("Insufficient data".to_string());
        }

        let mut cursor = data;

        let op = RecordOp::from_u8(cursor.get_u8()).ok_or("Invalid operation type")?;
        let timestamp = cursor.get_u64_le();

        let key = read_string(&mut cursor, "key")?;
        if cursor.remaining() < 4 {
            return Err("Missing value length".to_string());
        }
        let value = read_string(&mut cursor, "value")?;

        if cursor.remaining() < 8 {
            return Err("Missing checksum".to_string());
        }
        let body_len = data.len() - cursor.remaining();
        let stored_checksum = cursor.get_u64_le();

        let calculated_checksum = xxhash_rust::xxh64::xxh64(&data[..body_len], 0);
        if stored_checksum != calculated_checksum {
            return Err(format!(
                "Checksum mismatch: expected {}, got {}",
                stored_checksum, calculated_checksum
            ));
        }

        Ok((
            LogRecord {
                op,
                timestamp,
                key,
                value,
            },
            body_len + 8,
        ))
    }
}

/// Read a u32-length-prefixed UTF-8 string
fn read_string(cursor: &mut &[u8], field: &str) -> Result<String, String> {
    let len = cursor.get_u32_le() as usize;
    if cursor.remaining() < len {
        return Err(format!("Invalid {} length", field));
    }

    let text = std::str::from_utf8(&cursor[..len])
        .map_err(|_| format!("Invalid {} encoding", field))?
        .to_string();
    cursor.advance(len);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize_set() {
        let record = LogRecord::set("mykey", "myvalue");

        let bytes = record.to_bytes();
        let (decoded, size) = LogRecord::from_bytes(&bytes).unwrap();

        assert_eq!(size, bytes.len());
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_records_are_self_delimiting() {
        let mut data = LogRecord::remove("a").to_bytes();
        data.extend_from_slice(&LogRecord::set("b", "héllo").to_bytes());

        let (first, size) = LogRecord::from_bytes(&data).unwrap();
        assert_eq!(first.op, RecordOp::Remove);
        assert_eq!(first.value, "");

        let (second, _) = LogRecord::from_bytes(&data[size..]).unwrap();
        assert_eq!(second.key, "b");
        assert_eq!(second.value, "héllo");
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = LogRecord::set("key", "value").to_bytes();

        // Corrupt the checksum
        let len = bytes.len();
        bytes[len - 1] ^= 0xFF;

        let result = LogRecord::from_bytes(&bytes);
        assert!(result.unwrap_err().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record() {
        let bytes = LogRecord::set("key", "a longer value").to_bytes();
        assert!(LogRecord::from_bytes(&bytes[..bytes.len() - 10]).is_err());
    }

    #[test]
    fn test_unknown_op() {
        let mut bytes = LogRecord::clear().to_bytes();
        bytes[0] = 42;
        assert_eq!(
            LogRecord::from_bytes(&bytes).unwrap_err(),
            "Invalid operation type"
        );
    }
}
