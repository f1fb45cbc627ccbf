//! Shared application state (spec §6.1), grounded on the teacher's
//! `riptide-api::state::AppState` pattern: one struct holding `Arc`-
//! wrapped handles to every subsystem, cloned cheaply into each request.

use crate::errors::ApiError;
use archivist_chat::Answerer;
use archivist_extract::ocr::render::PdfRenderer;
use archivist_extract::OcrProvider;
use archivist_index::VectorIndexer;
use archivist_storage::{ObjectStoreAdapter, RecordStore};
use archivist_types::{ContentType, DocId, NumericContextCache, Session, SessionId, TaskId};
use archivist_worker::TaskController;
use dashmap::DashMap;
use std::sync::Arc;

pub const SESSIONS_TABLE: &str = "sessions";

/// Per-session ephemeral calculation-shortcut cache (spec §3
/// NumericContextCache, "scoped to session lifetime"). Kept in memory
/// rather than in the `RecordStore`, matching spec §9's redesign flag: a
/// concurrent map keyed by session_id with TTL, not a persisted table.
pub type NumericCacheRegistry = Arc<DashMap<SessionId, NumericContextCache>>;

#[derive(Clone)]
pub struct AppState {
    pub task_controller: Arc<TaskController>,
    pub object_store: Arc<ObjectStoreAdapter>,
    pub indexer: Arc<VectorIndexer>,
    pub answerer: Arc<Answerer>,
    pub ocr: Arc<dyn OcrProvider>,
    pub renderer: Arc<dyn PdfRenderer>,
    records: RecordStore,
    numeric_caches: NumericCacheRegistry,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_controller: Arc<TaskController>,
        object_store: Arc<ObjectStoreAdapter>,
        indexer: Arc<VectorIndexer>,
        answerer: Arc<Answerer>,
        ocr: Arc<dyn OcrProvider>,
        renderer: Arc<dyn PdfRenderer>,
        records: RecordStore,
    ) -> Self {
        Self {
            task_controller,
            object_store,
            indexer,
            answerer,
            ocr,
            renderer,
            records,
            numeric_caches: Arc::new(DashMap::new()),
        }
    }

    pub async fn create_session(&self, user_id: String) -> Result<Session, ApiError> {
        let session = Session::new(user_id);
        self.records
            .put(SESSIONS_TABLE, &session.session_id.to_string(), &session)
            .await?;
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<Session, ApiError> {
        self.records
            .get::<Session>(SESSIONS_TABLE, &session_id.to_string())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("session {session_id}")))
    }

    pub async fn put_session(&self, session: &Session) -> Result<(), ApiError> {
        self.records
            .put(SESSIONS_TABLE, &session.session_id.to_string(), session)
            .await?;
        Ok(())
    }

    /// Removes and returns the session's numeric cache (a fresh one if
    /// this is the first turn), so callers can hold it across `await`
    /// points without pinning a `DashMap` shard guard there.
    pub fn take_numeric_cache(&self, session_id: &SessionId) -> NumericContextCache {
        self.numeric_caches
            .remove(session_id)
            .map(|(_, cache)| cache)
            .unwrap_or_else(NumericContextCache::with_default_ttl)
    }

    pub fn put_numeric_cache(&self, session_id: &SessionId, mut cache: NumericContextCache) {
        cache.evict_expired();
        self.numeric_caches.insert(session_id.clone(), cache);
    }

    pub fn drop_numeric_cache(&self, session_id: &SessionId) {
        self.numeric_caches.remove(session_id);
    }

    /// Re-extract text from a task's stored artifact and feed it to the
    /// Vector Indexer under the session's store (spec §6.1 "link-task"
    /// triggers background Vector Indexer processing). The raw body is
    /// the only thing persisted by the Crawler Engine; extracted text is
    /// never cached, so this runs the same extraction tier chain again.
    pub async fn index_task_document(
        &self,
        session_id: &SessionId,
        user_id: &str,
        task_id: &TaskId,
        doc_id: &DocId,
    ) -> Result<(), ApiError> {
        let metadata_key = archivist_storage::keys::crawled_document_metadata_key(user_id, task_id, doc_id);
        let metadata = self.object_store.get_metadata(&metadata_key).await?;
        let body = self.object_store.get_document_body(user_id, task_id, doc_id).await?;

        let extracted = archivist_extract::extract_text(
            metadata.content_type,
            &body,
            &metadata.filename,
            self.ocr.as_ref(),
            self.renderer.as_ref(),
        )
        .await;

        let attributes = archivist_types::ProcessedAttributes {
            session_id: session_id.clone(),
            user_id: user_id.to_string(),
            source: "crawl".to_string(),
            content_type: content_type_label(metadata.content_type),
            extra: Default::default(),
        };

        self.indexer
            .process(doc_id, &extracted.text, &metadata.filename, attributes)
            .await?;
        Ok(())
    }

    /// Identical downstream processing for an uploaded file (spec §6.1
    /// upload endpoint: "identical downstream processing").
    pub async fn index_uploaded_document(
        &self,
        session_id: &SessionId,
        user_id: &str,
        doc_id: &DocId,
        filename: &str,
        content_type: ContentType,
        body: &[u8],
    ) -> Result<(), ApiError> {
        let extracted =
            archivist_extract::extract_text(content_type, body, filename, self.ocr.as_ref(), self.renderer.as_ref())
                .await;

        let attributes = archivist_types::ProcessedAttributes {
            session_id: session_id.clone(),
            user_id: user_id.to_string(),
            source: "upload".to_string(),
            content_type: content_type_label(content_type),
            extra: Default::default(),
        };

        self.indexer.process(doc_id, &extracted.text, filename, attributes).await?;
        Ok(())
    }
}

fn content_type_label(content_type: ContentType) -> String {
    content_type.default_extension().to_string()
}
