//! Durable key-value storage backends for the offline cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Key-value store that survives process restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    written_at: DateTime<Utc>,
}

/// One JSON file per key inside a cache directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid cache key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache file: {}", key));
            }
        };

        let stored: StoredValue = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", key))?;
        Ok(Some(stored.value))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let stored = StoredValue {
            value: value.to_string(),
            written_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;

        // Write then rename so readers never see a partial file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .with_context(|| format!("Failed to write cache file: {}", key))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace cache file: {}", key))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete cache file: {}", key)),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    pub put_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail, to exercise write-failure paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            bail!("store is read-only");
        }
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip_and_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("csv_xc").await.unwrap(), None);
        store.put("csv_xc", "distance,gender\n5K,Boys\n").await.unwrap();
        store.put("csv_xc", "distance,gender\n3K,Girls\n").await.unwrap();

        // A fresh store over the same directory sees the last write.
        let reopened = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.get("csv_xc").await.unwrap().as_deref(),
            Some("distance,gender\n3K,Girls\n")
        );

        reopened.delete("csv_xc").await.unwrap();
        assert_eq!(store.get("csv_xc").await.unwrap(), None);
        // Deleting a missing key is not an error.
        reopened.delete("csv_xc").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.put("../escape", "x").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("csv_training.json"), "not json").unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.get("csv_training").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_fail_writes() {
        let store = MemoryStore::new();
        store.put("a", "1").await.unwrap();
        store.set_fail_writes(true);
        assert!(store.put("a", "2").await.is_err());
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.put_calls.load(Ordering::Relaxed), 2);
    }
}
