//! SQLite-backed key/value store.
//!
//! # Responsibility
//! - Open and bootstrap the on-device SQLite database holding record blobs.
//! - Keep SQL details inside this persistence boundary.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer build is rejected, never migrated down.

use super::{LocalStore, StoreError, StoreResult};
use log::{error, info};
use rusqlite::{params, Connection};
use std::path::Path;
use std::time::{Duration, Instant};

const KV_SCHEMA_VERSION: u32 = 1;
const KV_INIT_SQL: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);";

/// Durable key/value store over a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path` and applies schema bootstrap.
    ///
    /// # Side effects
    /// - Emits `store_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_open module=store status=start mode=file");

        let conn = Connection::open(path).map_err(|err| {
            error!(
                "event=store_open module=store status=error mode=file duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            StoreError::from(err)
        })?;

        Self::bootstrap(conn, "file", started_at)
    }

    /// Opens an in-memory store, useful for smoke runs and tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_open module=store status=start mode=memory");

        let conn = Connection::open_in_memory().map_err(|err| {
            error!(
                "event=store_open module=store status=error mode=memory duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            StoreError::from(err)
        })?;

        Self::bootstrap(conn, "memory", started_at)
    }

    fn bootstrap(conn: Connection, mode: &str, started_at: Instant) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;

        let db_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if db_version > KV_SCHEMA_VERSION {
            error!(
                "event=store_open module=store status=error mode={mode} error_code=schema_too_new db_version={db_version}"
            );
            return Err(StoreError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: KV_SCHEMA_VERSION,
            });
        }
        if db_version < KV_SCHEMA_VERSION {
            conn.execute_batch(KV_INIT_SQL)?;
            conn.execute_batch(&format!("PRAGMA user_version = {KV_SCHEMA_VERSION};"))?;
        }

        info!(
            "event=store_open module=store status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self { conn })
    }
}

impl LocalStore for SqliteStore {
    fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1;")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1;", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::store::LocalStore;

    #[test]
    fn set_get_delete_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_string("k").unwrap(), None);

        store.set_string("k", "v1").unwrap();
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v1"));

        store.set_string("k", "v2").unwrap();
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v2"));

        store.delete("k").unwrap();
        assert_eq!(store.get_string("k").unwrap(), None);
    }

    #[test]
    fn delete_missing_key_is_benign() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.delete("absent").unwrap();
    }
}
