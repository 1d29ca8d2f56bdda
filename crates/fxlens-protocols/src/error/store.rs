//! Settings storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
