//! course-store - Course content store for a renewable-energy course
//!
//! Holds the course modules (Solar PV, Wind Power, Hydropower, Geothermal,
//! Solar Thermal), their content lists, display stats and a short
//! notification log, and persists the whole state as a versioned snapshot.
//!
//! # Architecture
//!
//! - `CourseStore` is a plain in-memory value with a CRUD surface; it does
//!   no I/O and counts its own revisions
//! - `PersistedStore` wraps a store and writes a snapshot to a key/value
//!   storage area after every mutation that changed something
//! - Storage areas are pluggable: memory, JSON file, SQLite
//!
//! # Modules
//!
//! - `domain`: Data structures (Module, ContentItem, Stats, Notification)
//! - `store`: The store, snapshots and storage backends
//! - `config`: Path and backend resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! course-store add wind-power videos --title "Turbine Basics" -d Intro
//! course-store list wind-power videos
//! course-store notifications
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{
    ContentDraft, ContentItem, ContentPatch, ContentType, Module, NewNotification, Notification,
    Severity, Stats, StatsPatch,
};
pub use store::{
    CourseState, CourseStore, FileStorage, MemoryStorage, PersistedStore, Snapshot,
    SnapshotStorage, SqliteStorage, StorageError, StoreError,
};
