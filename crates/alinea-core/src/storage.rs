use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("no active transaction")]
    NoActiveTransaction,
    #[error("a transaction is already active")]
    TransactionActive,
}

pub type TransactionId = u64;

/// Logical keys of the persisted state.
pub mod keys {
    pub const CURRENT_USER: &str = "currentUser";
    pub const USERS: &str = "users";
    pub const REPORTS: &str = "reports";
}

/// A flat string-to-string store. Values are opaque serialized blobs; the
/// stores above decide what goes in them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn begin_transaction(&self) -> Result<TransactionId, StorageError>;
    fn commit_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError>;
    fn rollback_transaction(&self, tx_id: TransactionId) -> Result<(), StorageError>;
}
