//! `ApiError` (spec §6.1 status-code mapping): one error type every
//! handler returns, translated into the `{task_id,...}`-shaped JSON body
//! the teacher's `riptide-api::errors::ApiError` uses, scaled down to the
//! status classes this surface actually needs.

use archivist_chat::ChatError;
use archivist_index::IndexerError;
use archivist_storage::StorageError;
use archivist_types::ErrorKind;
use archivist_worker::WorkerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("task is already terminal")]
    AlreadyTerminal,
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("task controller failed: {0}")]
    Worker(#[from] WorkerError),
    #[error("retrieval or indexing failed: {0}")]
    Indexer(#[from] IndexerError),
    #[error("chat pipeline failed: {0}")]
    Chat(#[from] ChatError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyTerminal => StatusCode::CONFLICT,
            ApiError::Worker(WorkerError::TaskNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Worker(WorkerError::AlreadyTerminal(_)) => StatusCode::CONFLICT,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Indexer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // LLM failures are handled in the chat handler itself (spec §9
            // "LLM error" -> canned apology, HTTP 200); any `ChatError`
            // that reaches here is a retrieval-layer failure.
            ApiError::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::AlreadyTerminal => "already_terminal",
            ApiError::Worker(WorkerError::TaskNotFound(_)) => "not_found",
            ApiError::Worker(WorkerError::AlreadyTerminal(_)) => "already_terminal",
            ApiError::Worker(_) => "internal_error",
            ApiError::Storage(StorageError::NotFound(_)) => "not_found",
            ApiError::Storage(_) => "internal_error",
            ApiError::Indexer(_) => "internal_error",
            ApiError::Chat(_) => "internal_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// The `ErrorKind` taxonomy bucket this maps to (spec §7), logged so
    /// operators can correlate an HTTP failure with the underlying
    /// component that raised it.
    fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Storage(e) => Some(e.kind()),
            ApiError::Worker(e) => Some(e.kind()),
            ApiError::Indexer(e) => Some(e.kind()),
            ApiError::Chat(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => error!(error = %self, kind = ?self.kind(), "request failed"),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => warn!(error = %self, "request rejected"),
            _ => {}
        }
        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}
