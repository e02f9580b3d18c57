//! SQLite storage backend for Alinea.
//!
//! Keeps every key in a single `kv` table, which is all the stores need:
//! each of them rewrites its whole collection under one key.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use alinea_core::storage::{KeyValueStore, StorageError, TransactionId};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    tx_counter: AtomicU64,
    active_tx: Mutex<Option<TransactionId>>,
}

fn backend_err(e: rusqlite::Error) -> StorageError {
    StorageError::Other(e.to_string())
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`. `":memory:"` gives a
    /// private in-memory database.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(backend_err)?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(backend_err)?;

        let storage = Self {
            conn: Mutex::new(conn),
            tx_counter: AtomicU64::new(1),
            active_tx: Mutex::new(None),
        };
        storage.init_schema()?;
        tracing::debug!(path, "SQLite store opened");
        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(backend_err)?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(backend_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(backend_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(backend_err)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .map_err(backend_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(backend_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend_err)
    }

    fn begin_transaction(&self) -> Result<TransactionId, StorageError> {
        let mut active = self.active_tx.lock().map_err(|_| StorageError::Poisoned)?;
        if active.is_some() {
            return Err(StorageError::TransactionActive);
        }
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch("SAVEPOINT alinea_tx")
            .map_err(backend_err)?;
        let tx_id = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        *active = Some(tx_id);
        tracing::debug!(tx_id, "SQLite transaction started");
        Ok(tx_id)
    }

    fn commit_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError> {
        let mut active = self.active_tx.lock().map_err(|_| StorageError::Poisoned)?;
        if *active != Some(tx_id) {
            return Err(StorageError::NoActiveTransaction);
        }
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch("RELEASE SAVEPOINT alinea_tx")
            .map_err(backend_err)?;
        *active = None;
        tracing::debug!(tx_id, "SQLite transaction committed");
        Ok(())
    }

    fn rollback_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError> {
        let mut active = self.active_tx.lock().map_err(|_| StorageError::Poisoned)?;
        if *active != Some(tx_id) {
            return Err(StorageError::NoActiveTransaction);
        }
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        // ROLLBACK TO leaves the savepoint open; release it to end the transaction.
        conn.execute_batch("ROLLBACK TO SAVEPOINT alinea_tx; RELEASE SAVEPOINT alinea_tx")
            .map_err(backend_err)?;
        *active = None;
        tracing::debug!(tx_id, "SQLite transaction rolled back");
        Ok(())
    }
}
