//! Key/value storage areas that hold serialized snapshots.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use fs2::FileExt;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock failed: {0}")]
    Lock(String),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string key/value storage area
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key).await
    }
}

/// Process-local storage; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temp file that is renamed into place while holding an
/// exclusive lock on `<key>.lock`, so concurrent CLI invocations never see a
/// half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn item_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.item_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        Ok(Some(content))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;
        let lock_path = self.lock_path(key);
        let dir = self.dir.clone();
        let value = value.to_string();

        tokio::task::spawn_blocking(move || write_locked(&dir, &lock_path, &path, &value))
            .await
            .map_err(|e| StorageError::Lock(format!("Write task failed: {}", e)))??;

        debug!(key, dir = %self.dir.display(), "Wrote storage item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Atomically replace `path` with `value` under an exclusive file lock
fn write_locked(dir: &Path, lock_path: &Path, path: &Path, value: &str) -> Result<(), StorageError> {
    std::fs::create_dir_all(dir)?;

    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    lock.lock_exclusive()
        .map_err(|e| StorageError::Lock(format!("{}: {}", lock_path.display(), e)))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;

    // Lock is released when `lock` is dropped
    Ok(())
}

/// Keys become file names, so keep them to a safe character set
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
