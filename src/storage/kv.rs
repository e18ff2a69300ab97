use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::StorageResult;

/// String-keyed store of JSON-serialized values
///
/// The client-storage analogue every persisted slot goes through. One
/// writer at a time per key; there is no cross-process coordination, so
/// concurrent writers race and the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for a key, if present
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write the raw value for a key, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a key; deleting an absent key is not an error
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check whether a key is present
    async fn contains(&self, key: &str) -> StorageResult<bool>;
}

/// File-backed store: one JSON document per key under a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => {
                debug!("Read {} bytes", value.len());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        tokio::fs::write(self.path_for(key), value).await?;
        debug!("Stored value");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> StorageResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(tokio::fs::try_exists(self.path_for(key)).await?)
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn contains(&self, key: &str) -> StorageResult<bool> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(key))
    }
}
