use crate::llm::LlmError;
use archivist_index::IndexerError;
use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexerError),
    #[error("llm call failed: {0}")]
    Llm(#[from] LlmError),
}

impl ChatError {
    /// LLM failures fall under the shared `ErrorKind::LlmError` bucket
    /// (spec §7), which the caller turns into the canned-apology
    /// response rather than an HTTP 500 (spec §9 "LLM error" scenario).
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::Retrieval(_) => ErrorKind::VectorStoreError,
            ChatError::Llm(_) => ErrorKind::LlmError,
        }
    }
}
