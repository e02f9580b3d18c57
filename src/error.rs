use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AlineaError {
    /// Does not say whether the username or the password was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid backup file")]
    CorruptBackup,
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("this action requires the admin role")]
    Forbidden,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("date formatting error: {0}")]
    Format(#[from] time::error::Format),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for AlineaError {
    fn from(errors: ValidationErrors) -> Self {
        AlineaError::Validation(errors)
    }
}

pub type Result<T, E = AlineaError> = std::result::Result<T, E>;
