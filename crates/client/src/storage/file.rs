//! File-backed storage backend.
//!
//! The whole store is one JSON document on disk (a string-to-string map),
//! loaded at open and rewritten on every mutation. Writes go to a sibling
//! temp file first and are renamed into place, so a crash mid-write leaves
//! the previous document intact. The write lock is held across the disk
//! write, which serializes writers and makes every mutation write-through.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Storage, StorageError, StorageKey};

/// Key-value store persisted as a single JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`, creating parent directories as needed. A
    /// missing file starts the store empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failures and
    /// `StorageError::Deserialize` if an existing document is corrupt.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                serde_json::from_str(&raw).map_err(|source| StorageError::Deserialize {
                    context: path.display().to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), "opened key-value store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// The path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the document from the given snapshot (temp file + rename).
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw =
            serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Serialize {
                context: self.path.display().to_string(),
                source,
            })?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &StorageKey<'_>) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&key.to_string()).cloned())
    }

    async fn put(&self, key: &StorageKey<'_>, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    async fn remove(&self, key: &StorageKey<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if entries.remove(&key.to_string()).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}
