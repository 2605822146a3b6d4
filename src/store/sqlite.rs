//! SQLite-backed key/value storage area.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::storage::{SnapshotStorage, StorageError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Key/value table in a SQLite database file
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// When `key` was last written (RFC 3339)
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let updated = conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated)
    }
}

#[async_trait]
impl SnapshotStorage for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_upsert_and_remove() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        storage.set_item("course-storage", "one").await.unwrap();
        storage.set_item("course-storage", "two").await.unwrap();
        assert_eq!(
            storage.get_item("course-storage").await.unwrap().as_deref(),
            Some("two")
        );
        assert!(storage.updated_at("course-storage").unwrap().is_some());

        storage.remove_item("course-storage").await.unwrap();
        assert!(storage.get_item("course-storage").await.unwrap().is_none());
        assert!(storage.updated_at("course-storage").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_connections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db").join("course.sqlite");

        SqliteStorage::open(&path)
            .unwrap()
            .set_item("k", "v")
            .await
            .unwrap();

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("k").await.unwrap().as_deref(), Some("v"));
    }
}
