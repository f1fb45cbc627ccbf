use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] archivist_proxy::ProxyError),
    #[error("storage failed: {0}")]
    Storage(#[from] archivist_storage::StorageError),
    #[error("crawl cancelled")]
    Cancelled,
}

impl CrawlerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlerError::Fetch(e) => e.kind(),
            CrawlerError::Storage(e) => e.kind(),
            CrawlerError::Cancelled => ErrorKind::TaskFatal,
        }
    }
}
