//! Persistence layer.
//!
//! RULE: the clock and engine only see the KeyValueStore trait.
//! SimStore is the SQLite adapter; MemoryStore is the test fake.

use crate::error::SimResult;
use rusqlite::{params, Connection, OptionalExtension};

mod memory;

pub use memory::MemoryStore;

/// Get/set-by-key storage capability.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> SimResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> SimResult<()>;
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_kv_store.sql"))?;
        Ok(())
    }

    pub fn entry_count(&self) -> SimResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_entry", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl KeyValueStore for SimStore {
    fn get(&self, key: &str) -> SimResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entry WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entry (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}
