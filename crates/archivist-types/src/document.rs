use crate::ids::TaskId;
use crate::{ContentType, DocId, Timestamp};
use serde::{Deserialize, Serialize};

/// One acquired artifact (spec §3 CrawledDocument).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledDocument {
    pub doc_id: DocId,
    pub task_id: TaskId,
    pub user_id: String,
    pub url: String,
    pub title: Option<String>,
    pub content_type: ContentType,
    pub is_binary: bool,
    /// UTF-8 extracted text, or a descriptive placeholder for binaries
    /// that could not be extracted (spec §4.4 failure modes).
    pub content_text: String,
    /// Object-store key of the raw body, set for binary artifacts.
    pub content_bytes_key: Option<String>,
    pub metadata_key: String,
    pub size_bytes: u64,
    pub status_code: Option<u16>,
    pub fetched_at: Timestamp,
    pub domain: String,
}

/// Sidecar metadata persisted alongside every artifact body (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub doc_id: DocId,
    pub url: String,
    pub title: Option<String>,
    pub content_type: ContentType,
    pub content_length: u64,
    pub raw_content_length: u64,
    pub fetched_at: Timestamp,
    pub status_code: Option<u16>,
    pub headers: std::collections::BTreeMap<String, String>,
    pub domain: String,
    pub filename: String,
    pub stored_at: Timestamp,
    pub body_key: String,
    pub metadata_key: String,
    pub user_id: String,
    pub task_id: TaskId,
}
