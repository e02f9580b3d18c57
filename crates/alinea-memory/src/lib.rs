//! In-memory storage backend for Alinea.
//!
//! Nothing survives the process. Used for tests and for `backend = "memory"`
//! sessions that should not touch disk.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
};

use alinea_core::storage::{KeyValueStore, StorageError, TransactionId};

pub struct InMemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    tx_counter: AtomicU64,
    snapshots: RwLock<HashMap<TransactionId, BTreeMap<String, String>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            tx_counter: AtomicU64::new(1),
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a store pre-populated with the given pairs.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.values.write() {
            map.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.keys().cloned().collect())
    }

    fn begin_transaction(&self) -> Result<TransactionId, StorageError> {
        let tx_id = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.values.read().map_err(|_| StorageError::Poisoned)?.clone();
        self.snapshots
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(tx_id, snapshot);
        tracing::debug!(tx_id, "Transaction started");
        Ok(tx_id)
    }

    fn commit_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError> {
        self.snapshots
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(&tx_id)
            .ok_or(StorageError::NoActiveTransaction)?;
        tracing::debug!(tx_id, "Transaction committed");
        Ok(())
    }

    fn rollback_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError> {
        let snapshot = self
            .snapshots
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(&tx_id)
            .ok_or(StorageError::NoActiveTransaction)?;
        *self.values.write().map_err(|_| StorageError::Poisoned)? = snapshot;
        tracing::debug!(tx_id, "Transaction rolled back");
        Ok(())
    }
}
