//! Vector Indexer + Deduplication Index (spec §4.6). Dedup is not a
//! separate store: it's a lookup against `ProcessedDocument` records
//! already persisted for the session, keyed by normalized-text content
//! hash rather than URL or filename (spec invariant).

use crate::provider::{SearchHit, VectorStoreError, VectorStoreProvider};
use archivist_storage::RecordStore;
use archivist_types::{content_hash, DocId, ErrorKind, ProcessedAttributes, ProcessedDocument, SessionId};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

const PROCESSED_DOCUMENTS_TABLE: &str = "processed_documents";
const SESSION_VECTOR_STORE_TABLE: &str = "session_vector_stores";

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
    #[error(transparent)]
    Storage(#[from] archivist_storage::StorageError),
}

impl IndexerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexerError::VectorStore(_) => ErrorKind::VectorStoreError,
            IndexerError::Storage(e) => e.kind(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SessionVectorStore {
    session_id: SessionId,
    vector_store_id: String,
}

pub struct VectorIndexer {
    provider: Arc<dyn VectorStoreProvider>,
    records: RecordStore,
}

impl VectorIndexer {
    pub fn new(provider: Arc<dyn VectorStoreProvider>, records: RecordStore) -> Self {
        Self { provider, records }
    }

    async fn vector_store_for_session(&self, session_id: &SessionId) -> Result<String, IndexerError> {
        let key = session_id.to_string();
        if let Some(existing) = self
            .records
            .get::<SessionVectorStore>(SESSION_VECTOR_STORE_TABLE, &key)
            .await?
        {
            return Ok(existing.vector_store_id);
        }
        let store_id = self.provider.create_store(&key).await?;
        self.records
            .put(
                SESSION_VECTOR_STORE_TABLE,
                &key,
                &SessionVectorStore {
                    session_id: session_id.clone(),
                    vector_store_id: store_id.clone(),
                },
            )
            .await?;
        Ok(store_id)
    }

    /// Find an existing non-duplicate `ProcessedDocument` in this session
    /// with the same content hash (spec §4.6 step 2).
    async fn find_original(
        &self,
        session_id: &SessionId,
        hash: &str,
    ) -> Result<Option<ProcessedDocument>, IndexerError> {
        let all: Vec<ProcessedDocument> = self.records.list(PROCESSED_DOCUMENTS_TABLE).await?;
        Ok(all.into_iter().find(|doc| is_dedup_original(doc, session_id, hash)))
    }

    /// Add extracted text to the session's vector store, deduplicating on
    /// normalized-text content hash (spec §4.6 `process`).
    #[instrument(skip(self, text, attributes))]
    pub async fn process(
        &self,
        doc_id: &DocId,
        text: &str,
        filename: &str,
        attributes: ProcessedAttributes,
    ) -> Result<ProcessedDocument, IndexerError> {
        let hash = content_hash(text);
        let session_id = attributes.session_id.clone();

        if let Some(original) = self.find_original(&session_id, &hash).await? {
            let duplicate = ProcessedDocument::new_duplicate(doc_id.clone(), filename.to_string(), &original, attributes);
            self.records
                .put(PROCESSED_DOCUMENTS_TABLE, doc_id.as_str(), &duplicate)
                .await?;
            return Ok(duplicate);
        }

        let store_id = self.vector_store_for_session(&session_id).await?;
        let attrs_json = serde_json::to_value(&attributes).unwrap_or_default();
        let vector_file_id = self
            .provider
            .upload_file(&store_id, filename, text, &attrs_json)
            .await?;

        let processed = ProcessedDocument::new_success(
            doc_id.clone(),
            filename.to_string(),
            vector_file_id,
            store_id,
            hash,
            text.len(),
            attributes,
        );
        self.records
            .put(PROCESSED_DOCUMENTS_TABLE, doc_id.as_str(), &processed)
            .await?;
        Ok(processed)
    }

    /// One search call against the session's vector store; the caller
    /// (Retriever) owns threshold retries (spec §4.6 `search`).
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        session_id: &SessionId,
        query: &str,
        max_results: u32,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, IndexerError> {
        let store_id = self.vector_store_for_session(session_id).await?;
        Ok(self.provider.search(&store_id, query, max_results, threshold).await?)
    }

    /// Raw vector-store file listing (including in-flight indexing
    /// status), used by the Retriever to distinguish "nothing indexed
    /// yet" from "genuinely no matches" (spec §4.8 step 4).
    #[instrument(skip(self))]
    pub async fn vector_files(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<crate::provider::VectorStoreFile>, IndexerError> {
        let store_id = self.vector_store_for_session(session_id).await?;
        Ok(self.provider.list_files(&store_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, doc_id: &DocId) -> Result<(), IndexerError> {
        if let Some(doc) = self
            .records
            .get::<ProcessedDocument>(PROCESSED_DOCUMENTS_TABLE, doc_id.as_str())
            .await?
        {
            self.provider
                .delete_file(&doc.vector_store_id, &doc.vector_file_id)
                .await
                .ok();
            self.records.delete(PROCESSED_DOCUMENTS_TABLE, doc_id.as_str()).await?;
        }
        Ok(())
    }

    pub async fn list(&self, session_id: &SessionId) -> Result<Vec<ProcessedDocument>, IndexerError> {
        let all: Vec<ProcessedDocument> = self.records.list(PROCESSED_DOCUMENTS_TABLE).await?;
        Ok(all
            .into_iter()
            .filter(|d| &d.attributes.session_id == session_id)
            .collect())
    }

    /// Diagnostic counts: total processed, duplicates, and distinct
    /// vector files actually stored (spec §4.6 `stats`).
    pub async fn stats(&self, session_id: &SessionId) -> Result<IndexerStats, IndexerError> {
        let docs = self.list(session_id).await?;
        let total = docs.len();
        let duplicates = docs.iter().filter(|d| d.is_duplicate).count();
        let distinct_files = docs
            .iter()
            .map(|d| d.vector_file_id.clone())
            .collect::<std::collections::HashSet<_>>()
            .len();
        Ok(IndexerStats { total, duplicates, distinct_files })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerStats {
    pub total: usize,
    pub duplicates: usize,
    pub distinct_files: usize,
}

/// Dedup matching predicate (spec §4.6 invariant: keyed by normalized-text
/// content hash, scoped to session, and only against non-duplicate
/// originals). Pulled out as a pure function so it's testable without a
/// database.
fn is_dedup_original(doc: &ProcessedDocument, session_id: &SessionId, hash: &str) -> bool {
    &doc.attributes.session_id == session_id && doc.content_hash == hash && !doc.is_duplicate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn attrs(session_id: SessionId) -> ProcessedAttributes {
        ProcessedAttributes {
            session_id,
            user_id: "alice".into(),
            source: "crawl".into(),
            content_type: "html".into(),
            extra: BTreeMap::new(),
        }
    }

    fn sample_doc(session_id: SessionId, hash: &str, is_duplicate: bool) -> ProcessedDocument {
        ProcessedDocument::new_success(
            DocId::from_hex("aaaaaaaaaaaaaaaa".to_string()),
            "a.html".into(),
            "file-1".into(),
            "store-1".into(),
            hash.to_string(),
            100,
            attrs(session_id),
        )
        .tap_duplicate(is_duplicate)
    }

    trait TapDuplicate {
        fn tap_duplicate(self, is_duplicate: bool) -> Self;
    }

    impl TapDuplicate for ProcessedDocument {
        fn tap_duplicate(mut self, is_duplicate: bool) -> Self {
            self.is_duplicate = is_duplicate;
            self
        }
    }

    #[test]
    fn matches_same_session_and_hash_when_not_a_duplicate() {
        let session = SessionId::new();
        let doc = sample_doc(session.clone(), "hash-1", false);
        assert!(is_dedup_original(&doc, &session, "hash-1"));
    }

    #[test]
    fn does_not_match_a_different_session() {
        let session = SessionId::new();
        let other_session = SessionId::new();
        let doc = sample_doc(session, "hash-1", false);
        assert!(!is_dedup_original(&doc, &other_session, "hash-1"));
    }

    #[test]
    fn does_not_match_a_different_hash() {
        let session = SessionId::new();
        let doc = sample_doc(session.clone(), "hash-1", false);
        assert!(!is_dedup_original(&doc, &session, "hash-2"));
    }

    #[test]
    fn does_not_match_an_existing_duplicate_record() {
        let session = SessionId::new();
        let doc = sample_doc(session.clone(), "hash-1", true);
        assert!(!is_dedup_original(&doc, &session, "hash-1"));
    }
}
