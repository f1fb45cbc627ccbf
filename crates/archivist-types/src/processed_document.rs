use crate::{now, DocId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Processed,
    DuplicateSkipped,
    Error,
}

/// Index-layer record linking a `CrawledDocument` (or an uploaded file) to
/// its entry in the vector store (spec §3 ProcessedDocument).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub doc_id: DocId,
    pub filename: String,
    pub vector_file_id: String,
    pub vector_store_id: String,
    pub content_hash: String,
    pub is_duplicate: bool,
    pub original_doc_id: Option<DocId>,
    pub attributes: ProcessedAttributes,
    pub content_length: usize,
    pub processed_at: Timestamp,
    pub status: ProcessingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedAttributes {
    pub session_id: SessionId,
    pub user_id: String,
    pub source: String,
    pub content_type: String,
    pub extra: BTreeMap<String, String>,
}

impl ProcessedDocument {
    pub fn new_success(
        doc_id: DocId,
        filename: String,
        vector_file_id: String,
        vector_store_id: String,
        content_hash: String,
        content_length: usize,
        attributes: ProcessedAttributes,
    ) -> Self {
        Self {
            doc_id,
            filename,
            vector_file_id,
            vector_store_id,
            content_hash,
            is_duplicate: false,
            original_doc_id: None,
            attributes,
            content_length,
            processed_at: now(),
            status: ProcessingStatus::Processed,
        }
    }

    pub fn new_duplicate(
        doc_id: DocId,
        filename: String,
        original: &ProcessedDocument,
        attributes: ProcessedAttributes,
    ) -> Self {
        Self {
            doc_id: doc_id.clone(),
            filename,
            vector_file_id: original.vector_file_id.clone(),
            vector_store_id: original.vector_store_id.clone(),
            content_hash: original.content_hash.clone(),
            is_duplicate: true,
            original_doc_id: Some(original.doc_id.clone()),
            attributes,
            content_length: original.content_length,
            processed_at: now(),
            status: ProcessingStatus::DuplicateSkipped,
        }
    }
}
