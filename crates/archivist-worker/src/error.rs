use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("storage failed: {0}")]
    Storage(#[from] archivist_storage::StorageError),
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("task {0} is already terminal")]
    AlreadyTerminal(String),
    #[error("dispatch queue is closed")]
    QueueClosed,
}

impl WorkerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkerError::Storage(e) => e.kind(),
            WorkerError::TaskNotFound(_) => ErrorKind::TaskFatal,
            WorkerError::AlreadyTerminal(_) => ErrorKind::TaskFatal,
            WorkerError::QueueClosed => ErrorKind::TaskFatal,
        }
    }
}
