//! Course content store and its persistence.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.course/
//! ├── config.yaml               # Optional (searched from the cwd upwards)
//! ├── course-storage.json       # Snapshot (file backend)
//! └── course.sqlite             # kv table (sqlite backend)
//! ```

pub mod course_store;
pub mod persisted;
pub mod snapshot;
pub mod sqlite;
pub mod storage;

// Re-export commonly used types
pub use course_store::{CourseState, CourseStore, SearchHit, StoreError};
pub use persisted::{backup_key, PersistedStore};
pub use snapshot::{rehydrate, Snapshot, DEFAULT_STORAGE_KEY, SNAPSHOT_VERSION};
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
