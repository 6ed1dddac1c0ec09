//! In-memory storage backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Storage, StorageError, StorageKey};

/// Memory-only storage, used by tests and as the no-persistence fallback
/// when no storage path is configured.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &StorageKey<'_>) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&key.to_string()).cloned())
    }

    async fn put(&self, key: &StorageKey<'_>, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &StorageKey<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.remove(&key.to_string());
        Ok(())
    }
}
