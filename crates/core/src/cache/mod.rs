//! Time-boxed JSON response cache.
//!
//! Each cached response is stored as a JSON envelope `{data, timestamp}`
//! under a single key of the underlying [`KeyValueStore`]. Freshness is
//! decided by the caller (see `CatalogClient`); this layer only reads,
//! writes and discards envelopes.

mod clock;

pub use clock::{Clock, SystemClock};

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

/// Prefix shared by every catalog cache key.
pub const CACHE_KEY_PREFIX: &str = "catalog_";

/// Errors raised by the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The stored envelope could not be parsed.
    #[error("Malformed cache entry for key {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// The underlying store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A cached response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Response body as returned by the catalog.
    pub data: Value,
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Age of the entry at `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }

    /// Whether the entry is still within `freshness` at `now_ms`.
    pub fn is_fresh(&self, now_ms: i64, freshness: Duration) -> bool {
        self.age_ms(now_ms) < i64::try_from(freshness.as_millis()).unwrap_or(i64::MAX)
    }
}

/// JSON envelope cache over a key-value store.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    /// Create a cache over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the envelope stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CacheError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Write `data` under `key`, stamped with `timestamp`.
    pub fn set(&self, key: &str, data: &Value, timestamp: i64) -> Result<(), CacheError> {
        let envelope = serde_json::json!({ "data": data, "timestamp": timestamp });
        self.store.set(key, &envelope.to_string())?;
        Ok(())
    }

    /// Delete the entry under `key`.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)?;
        Ok(())
    }

    /// Delete every catalog cache entry. Returns the number of keys removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let keys = self.store.keys_with_prefix(CACHE_KEY_PREFIX)?;
        for key in &keys {
            self.store.remove(key)?;
        }
        Ok(keys.len())
    }
}
