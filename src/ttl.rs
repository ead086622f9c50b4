//! Self-expiring values
//!
//! A TTL value is stored as a JSON envelope `{"value": "...", "expires": <ms>}`
//! where `expires` is an absolute UNIX time in milliseconds.
//!
//! Expiry is lazy: nothing sweeps expired entries. The first read that finds
//! an envelope past its expiry removes the key; an expired key that is never
//! read stays in the adapter.

use crate::error::Result;
use crate::storage::{resolve, StorageAdapter};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Stored form of a TTL value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub value: String,
    /// Expiration time, milliseconds since UNIX epoch
    #[serde(deserialize_with = "deserialize_expires")]
    pub expires: i64,
}

/// Read `expires`, rounding fractional milliseconds down
///
/// For an integer clock reading, `now > expires` holds exactly when
/// `now > floor(expires)`, so rounding down keeps the live boundary.
fn deserialize_expires<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(ms) = number.as_i64() {
        return Ok(ms);
    }
    match number.as_f64() {
        Some(ms) if ms.is_finite() => Ok(ms.floor() as i64),
        _ => Err(D::Error::custom(format!("invalid expiry timestamp {}", number))),
    }
}

impl Envelope {
    /// Expired strictly after `expires`; the boundary instant is still live
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires
    }
}

/// Current wall-clock time in milliseconds since UNIX epoch
pub fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(before_epoch) => -(before_epoch.duration().as_millis() as i64),
    }
}

/// Store `value` under `key`, expiring `ttl_ms` milliseconds from now
///
/// A negative `ttl_ms` stores an already expired value.
pub fn set_with_ttl(
    key: &str,
    value: &str,
    ttl_ms: i64,
    storage: Option<&dyn StorageAdapter>,
) -> Result<()> {
    set_with_ttl_at(key, value, ttl_ms, now_millis(), storage)
}

/// [`set_with_ttl`] with an explicit clock reading
pub fn set_with_ttl_at(
    key: &str,
    value: &str,
    ttl_ms: i64,
    now_ms: i64,
    storage: Option<&dyn StorageAdapter>,
) -> Result<()> {
    let storage = resolve(storage)?;
    let envelope = Envelope {
        value: value.to_string(),
        expires: now_ms.saturating_add(ttl_ms),
    };
    let text = serde_json::to_string(&envelope)?;
    storage.set_item(key, &text)
}

/// Read a TTL value; `None` if unset, expired or not an envelope
///
/// Reading an expired value removes the key. Text that is not an envelope
/// is logged and left in place.
pub fn get_with_ttl(key: &str, storage: Option<&dyn StorageAdapter>) -> Result<Option<String>> {
    get_with_ttl_at(key, now_millis(), storage)
}

/// [`get_with_ttl`] with an explicit clock reading
pub fn get_with_ttl_at(
    key: &str,
    now_ms: i64,
    storage: Option<&dyn StorageAdapter>,
) -> Result<Option<String>> {
    let storage = resolve(storage)?;

    let text = match storage.get_item(key) {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(None),
    };

    let envelope: Envelope = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Error parsing TTL value for key \"{}\": {}", key, e);
            return Ok(None);
        }
    };

    if envelope.is_expired_at(now_ms) {
        debug!("Key \"{}\" expired at {}, removing", key, envelope.expires);
        storage.remove_item(key)?;
        return Ok(None);
    }

    Ok(Some(envelope.value))
}
