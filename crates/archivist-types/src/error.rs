use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error taxonomy from spec §7, shared so every crate boundary
/// translates provider-specific failures into the same vocabulary instead
/// of inventing its own. Each crate still defines its own `thiserror` enum
/// for the errors only it can produce; those enums carry an `ErrorKind` so
/// the Task Controller / HTTP API can react uniformly (retry, skip, fail
/// task) without matching on crate-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 429 / 5xx / timeout / validator-false: retried, then recorded and
    /// skipped without failing the task.
    TransientFetch,
    /// 404 / 410 / 403: skipped, recorded, no escalation.
    PermanentFetch,
    /// Invalid HTML / corrupt archive: artifact kept, text becomes a
    /// placeholder.
    ParseError,
    /// A tier of the OCR chain declined the document; the chain moves on.
    OcrUnsupported,
    /// Object-store operation failed after retries; document dropped.
    ObjectStoreError,
    /// Vector-store upload failed; ProcessedDocument recorded with
    /// `status = error`.
    VectorStoreError,
    /// LLM call failed; canned apology returned, history not mutated.
    LlmError,
    /// Invalid seed URL, missing credentials, or similar: task -> failed.
    TaskFatal,
}

impl ErrorKind {
    /// Whether an error of this kind should trigger Proxy Gateway mode
    /// escalation (spec §4.1 Failure semantics).
    pub fn should_escalate(self) -> bool {
        matches!(self, ErrorKind::TransientFetch)
    }
}

/// A generic, loggable error carrying its taxonomy kind plus a message.
/// Crate-local error enums convert into this at their public boundary.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct ArchivistError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ArchivistError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
