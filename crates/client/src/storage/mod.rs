//! Local key-value persistence.
//!
//! The stores persist small JSON blobs to a local key-value store, the way
//! the mobile platform's storage API works: string keys, string values. The
//! [`Storage`] trait keeps that surface object-safe so stores can share one
//! `Arc<dyn Storage>`; [`read_json`]/[`write_json`] layer typed access over
//! it.
//!
//! # Durability
//!
//! Writes are write-through: a mutating store operation awaits its durable
//! write before returning. The remaining consistency gap is a crash in the
//! middle of a single write, which loses at most that in-flight operation -
//! acceptable for cart/wishlist state, and far narrower than the
//! fire-and-forget window a background write queue would leave.

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileStorage;
pub use keys::StorageKey;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the key-value storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("failed to serialize {context}: {source}")]
    Serialize {
        /// Key or document being written.
        context: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },

    /// A stored value could not be parsed.
    #[error("failed to parse {context}: {source}")]
    Deserialize {
        /// Key or document being read.
        context: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Object-safe local key-value store with string values.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    async fn get(&self, key: &StorageKey<'_>) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any prior value. The returned
    /// future resolves only once the value is durable.
    async fn put(&self, key: &StorageKey<'_>, value: String) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is not an
    /// error.
    async fn remove(&self, key: &StorageKey<'_>) -> Result<(), StorageError>;
}

/// Read and JSON-decode the value stored under `key`.
///
/// # Errors
///
/// Returns `StorageError::Deserialize` if a stored value does not parse as
/// `T`, and propagates backend errors.
pub async fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &StorageKey<'_>,
) -> Result<Option<T>, StorageError> {
    match storage.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Deserialize {
                context: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// JSON-encode `value` and store it under `key` (write-through).
///
/// # Errors
///
/// Returns `StorageError::Serialize` if encoding fails, and propagates
/// backend errors.
pub async fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &StorageKey<'_>,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        context: key.to_string(),
        source,
    })?;
    storage.put(key, raw).await
}
