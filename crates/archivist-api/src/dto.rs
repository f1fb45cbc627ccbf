//! Request/response bodies for every endpoint in spec §6.1. Kept as
//! plain `serde`-derived structs next to the handlers that use them,
//! matching the teacher's `riptide-api::models`/`dto` convention of
//! separating wire shapes from the domain types they're built from.

use archivist_types::{ContentType, CrawlConfig, CrawlTask, DocId, DocumentMetadata, SessionId, TaskId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateCrawlTaskRequest {
    pub url: String,
    #[serde(default)]
    pub max_documents: Option<u32>,
    #[serde(default)]
    pub render_js: bool,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CrawlTaskCreatedResponse {
    pub task_id: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CrawlTaskStartedResponse {
    pub task_id: String,
    pub status: &'static str,
}

/// Full `CrawlTask` record, returned verbatim for `GET
/// /crawl/tasks/{id}` (spec §6.1).
#[derive(Debug, Serialize)]
pub struct CrawlTaskView {
    pub task_id: String,
    pub user_id: String,
    pub seed_url: String,
    pub status: &'static str,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub config: CrawlConfig,
    pub documents_found: u32,
    pub documents_downloaded: u32,
    pub pages_crawled: u32,
    pub result: Vec<String>,
    pub failed_url_count: usize,
    pub error: Option<String>,
}

impl From<CrawlTask> for CrawlTaskView {
    fn from(task: CrawlTask) -> Self {
        Self {
            task_id: task.task_id.to_string(),
            user_id: task.user_id,
            seed_url: task.seed_url,
            status: status_label(task.status),
            created_at: task.created_at,
            updated_at: task.updated_at,
            config: task.config,
            documents_found: task.progress.documents_found,
            documents_downloaded: task.progress.documents_downloaded,
            pages_crawled: task.progress.pages_crawled,
            result: task.result.iter().map(|d| d.to_string()).collect(),
            failed_url_count: task.failed_urls.len(),
            error: task.error,
        }
    }
}

fn status_label(status: archivist_types::TaskStatus) -> &'static str {
    use archivist_types::TaskStatus::*;
    match status {
        Created => "created",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Document summary (spec §6.1 "`doc_id, url, title, size, content_type,
/// fetched_at`"), reconstructed from the sidecar metadata since
/// `CrawledDocument` itself is never persisted as a structured record.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    pub url: String,
    pub title: Option<String>,
    pub size: u64,
    pub content_type: &'static str,
    pub fetched_at: Timestamp,
}

impl DocumentSummary {
    pub fn from_metadata(doc_id: &DocId, metadata: &DocumentMetadata) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            url: metadata.url.clone(),
            title: metadata.title.clone(),
            size: metadata.raw_content_length,
            content_type: metadata.content_type.default_extension(),
            fetched_at: metadata.fetched_at,
        }
    }
}

/// Full document body (spec §6.1: "text or base64 of binary") plus
/// metadata.
#[derive(Debug, Serialize)]
pub struct DocumentDetail {
    pub doc_id: String,
    pub url: String,
    pub title: Option<String>,
    pub content_type: &'static str,
    pub is_base64: bool,
    pub body: String,
    pub metadata: DocumentSummary,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkTaskRequest {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkTaskResponse {
    pub linked_documents: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub doc_id: String,
    pub filename: String,
}

pub fn content_type_from_filename(filename: &str) -> ContentType {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    ContentType::from_extension(ext)
}

pub fn parse_task_id(raw: &str) -> Option<TaskId> {
    uuid::Uuid::parse_str(raw).ok().map(TaskId)
}

pub fn parse_session_id(raw: &str) -> Option<SessionId> {
    uuid::Uuid::parse_str(raw).ok().map(SessionId)
}
