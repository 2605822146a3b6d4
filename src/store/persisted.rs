//! Persistence adapter: keeps a storage area in step with a [`CourseStore`].
//!
//! The store itself never touches storage. Mutations go through
//! [`PersistedStore::apply`], which writes a whole-state snapshot whenever
//! the store's revision advanced.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::course_store::{CourseState, CourseStore};
use super::snapshot::{Snapshot, DEFAULT_STORAGE_KEY};
use super::storage::{SnapshotStorage, StorageError};

/// A course store bound to a storage backend
pub struct PersistedStore {
    store: CourseStore,
    storage: Box<dyn SnapshotStorage>,
    key: String,
    saved_revision: u64,
}

impl PersistedStore {
    /// Load the snapshot under the default key, or start from the seed
    pub async fn open(storage: impl SnapshotStorage + 'static) -> Result<Self, StorageError> {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY).await
    }

    pub async fn open_with_key(
        storage: impl SnapshotStorage + 'static,
        key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        Self::open_with_seed(storage, key, CourseState::seed(Utc::now())).await
    }

    /// Load the snapshot under `key` on top of an explicit seed
    pub async fn open_with_seed(
        storage: impl SnapshotStorage + 'static,
        key: impl Into<String>,
        seed: CourseState,
    ) -> Result<Self, StorageError> {
        let key = key.into();
        let storage: Box<dyn SnapshotStorage> = Box::new(storage);

        let store = match storage.get_item(&key).await? {
            Some(json) => match Snapshot::parse_compatible(&json) {
                Some(snapshot) => {
                    info!(backend = storage.name(), key = %key, "Loaded course snapshot");
                    snapshot.restore(seed)
                }
                None => {
                    let backup = backup_key(&key);
                    storage.set_item(&backup, &json).await?;
                    warn!(backend = storage.name(), key = %backup, "Kept discarded snapshot");
                    CourseStore::with_seed(seed)
                }
            },
            None => {
                debug!(backend = storage.name(), key = %key, "No snapshot, starting from seed");
                CourseStore::with_seed(seed)
            }
        };

        let saved_revision = store.revision();
        Ok(Self {
            store,
            storage,
            key,
            saved_revision,
        })
    }

    /// Read access for rendering
    pub fn store(&self) -> &CourseStore {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &str {
        self.storage.name()
    }

    /// Whether the in-memory state has changes not yet written
    pub fn is_dirty(&self) -> bool {
        self.store.revision() != self.saved_revision
    }

    /// Run a mutation and persist if it changed anything.
    ///
    /// Store errors come back inside `T`; only storage failures are `Err`.
    pub async fn apply<T>(
        &mut self,
        mutation: impl FnOnce(&mut CourseStore) -> T,
    ) -> Result<T, StorageError> {
        let result = mutation(&mut self.store);

        if self.is_dirty() {
            self.save().await?;
        }

        Ok(result)
    }

    /// Restore the seed and persist it
    pub async fn reset(&mut self) -> Result<(), StorageError> {
        self.apply(CourseStore::reset).await
    }

    /// Write the whole state under the configured key
    pub async fn save(&mut self) -> Result<(), StorageError> {
        let json = Snapshot::capture(&self.store).to_json()?;
        self.storage.set_item(&self.key, &json).await?;
        self.saved_revision = self.store.revision();

        debug!(
            backend = self.storage.name(),
            key = %self.key,
            revision = self.saved_revision,
            bytes = json.len(),
            "Saved course snapshot"
        );
        Ok(())
    }

    /// Remove the persisted snapshot; in-memory state is kept
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key).await?;
        info!(backend = self.storage.name(), key = %self.key, "Cleared course snapshot");
        Ok(())
    }
}

/// Key a discarded snapshot is copied to before the seed replaces it
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}
