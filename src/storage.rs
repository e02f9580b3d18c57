use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use alinea_memory::InMemoryStore;
use alinea_sqlite::SqliteStore;

use crate::config::{BackendKind, StorageConfig};
use crate::error::Result;

// Storage contracts live in alinea-core.
pub use alinea_core::storage::{keys, KeyValueStore, StorageError, TransactionId};

pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        BackendKind::Sqlite => Arc::new(SqliteStore::new(&config.path)?),
        BackendKind::Memory => Arc::new(InMemoryStore::new()),
    };
    tracing::debug!(backend = ?config.backend, path = %config.path, "Storage opened");
    Ok(store)
}

/// Reads and decodes the blob under `key`; `None` when nothing is stored.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    Ok(())
}
