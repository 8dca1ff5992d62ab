//! Persistent key-value storage.
//!
//! The cache and favorites layers both sit on top of a plain string
//! key-value store, the same shape as a browser's local storage: synchronous,
//! process-local, one value per key.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use thiserror::Error;

/// Errors raised by a key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's capacity.
    #[error("Storage quota exceeded: {required} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { required: u64, quota: u64 },

    /// Backend failure.
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for synchronous string key-value storage backends.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys starting with `prefix`.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Size a key/value pair occupies against a quota.
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
