use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("blob backend error: {0}")]
    Backend(#[from] object_store::Error),
    #[error("metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("metadata store error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound(_) | StorageError::Backend(_) => ErrorKind::ObjectStoreError,
            StorageError::Serialization(_) => ErrorKind::ParseError,
            StorageError::Database(_) => ErrorKind::ObjectStoreError,
        }
    }
}
