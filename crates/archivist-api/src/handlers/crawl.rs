//! Crawl task control endpoints (spec §6.1).

use crate::dto::{
    CrawlTaskCreatedResponse, CrawlTaskStartedResponse, CrawlTaskView, CreateCrawlTaskRequest, DocumentDetail,
    DocumentSummary,
};
use crate::dto::parse_task_id;
use crate::errors::ApiError;
use crate::state::AppState;
use archivist_types::CrawlConfig;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use serde::Deserialize;

pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<CreateCrawlTaskRequest>,
) -> Result<Json<CrawlTaskCreatedResponse>, ApiError> {
    if body.url.trim().is_empty() {
        return Err(ApiError::validation("url must not be empty"));
    }
    if body.user_id.trim().is_empty() {
        return Err(ApiError::validation("user_id must not be empty"));
    }

    let mut config = CrawlConfig::default();
    if let Some(max_documents) = body.max_documents {
        if max_documents == 0 {
            return Err(ApiError::validation("max_documents must be greater than zero"));
        }
        config.max_documents = max_documents;
    }
    config.render_js = body.render_js;

    let task = state
        .task_controller
        .create_task(body.user_id, body.url, config)
        .await?;

    Ok(Json(CrawlTaskCreatedResponse { task_id: task.task_id.to_string(), status: "created" }))
}

pub async fn start_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<CrawlTaskStartedResponse>, ApiError> {
    let task_id = parse_task_id(&task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let task = state.task_controller.start_task(&task_id).await?;
    Ok(Json(CrawlTaskStartedResponse { task_id: task.task_id.to_string(), status: "running" }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<CrawlTaskView>, ApiError> {
    let task_id = parse_task_id(&task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let task = state.task_controller.get_task(&task_id).await?;
    Ok(Json(task.into()))
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<CrawlTaskView>>, ApiError> {
    let tasks = state.task_controller.list_tasks().await?;
    Ok(Json(tasks.into_iter().map(CrawlTaskView::from).collect()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task_id = parse_task_id(&task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let task = state.task_controller.get_task(&task_id).await?;

    // Deleting a task deletes all its documents from the object store and
    // all its ProcessedDocument vector records too (spec §8 round-trip
    // law), so callers never see orphaned blobs or stale retrieval hits
    // for a task that no longer exists.
    for doc_id in &task.result {
        state
            .object_store
            .delete_crawled_document(&task.user_id, &task_id, doc_id)
            .await?;
        state.indexer.delete(doc_id).await?;
    }

    state.task_controller.delete_task(&task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DocumentsQuery {
    user_id: Option<String>,
}

pub async fn list_documents(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<DocumentsQuery>,
) -> Result<Json<Vec<DocumentSummary>>, ApiError> {
    let task_id = parse_task_id(&task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let task = state.task_controller.get_task(&task_id).await?;
    let user_id = query.user_id.unwrap_or(task.user_id.clone());

    let mut summaries = Vec::with_capacity(task.result.len());
    for doc_id in &task.result {
        let metadata_key = archivist_storage::keys::crawled_document_metadata_key(&user_id, &task_id, doc_id);
        let metadata = state.object_store.get_metadata(&metadata_key).await?;
        summaries.push(DocumentSummary::from_metadata(doc_id, &metadata));
    }
    Ok(Json(summaries))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path((task_id, doc_id)): Path<(String, String)>,
) -> Result<Json<DocumentDetail>, ApiError> {
    let task_id = parse_task_id(&task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let task = state.task_controller.get_task(&task_id).await?;
    let doc_id = doc_id
        .parse()
        .map_err(|_| ApiError::validation("invalid doc id"))?;
    if !task.result.contains(&doc_id) {
        return Err(ApiError::not_found(format!("document {doc_id}")));
    }

    let metadata_key = archivist_storage::keys::crawled_document_metadata_key(&task.user_id, &task_id, &doc_id);
    let metadata = state.object_store.get_metadata(&metadata_key).await?;
    let body = state
        .object_store
        .get_document_body(&task.user_id, &task_id, &doc_id)
        .await?;

    let (is_base64, body) = if metadata.content_type.is_binary() {
        (true, base64::engine::general_purpose::STANDARD.encode(&body))
    } else {
        (false, String::from_utf8_lossy(&body).into_owned())
    };

    Ok(Json(DocumentDetail {
        doc_id: doc_id.to_string(),
        url: metadata.url.clone(),
        title: metadata.title.clone(),
        content_type: metadata.content_type.default_extension(),
        is_base64,
        body,
        metadata: DocumentSummary::from_metadata(&doc_id, &metadata),
    }))
}
