//! Chat session endpoints (spec §6.1): session lifecycle, the
//! Query-Planner-then-Retriever-then-Answerer turn pipeline, linking a
//! finished crawl task's documents into the session's vector store, and
//! direct file uploads.

use crate::dto::{
    content_type_from_filename, parse_session_id, parse_task_id, LinkTaskRequest, LinkTaskResponse,
    PostMessageRequest, PostMessageResponse, SessionCreatedResponse, UploadResponse,
};
use crate::errors::ApiError;
use crate::state::AppState;
use archivist_chat::{ChatError, QueryPlanner};
use archivist_extract::text::pdf::detect_corruption;
use archivist_index::Retriever;
use archivist_types::{doc_id_for_url, ContentType, MessageRole, SessionProcessingStatus};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: String,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<SessionCreatedResponse>, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::validation("user_id must not be empty"));
    }
    let session = state.create_session(body.user_id).await?;
    Ok(Json(SessionCreatedResponse { session_id: session.session_id.to_string() }))
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    if body.content.trim().is_empty() {
        return Err(ApiError::validation("content must not be empty"));
    }
    let session_id = parse_session_id(&session_id).ok_or_else(|| ApiError::validation("invalid session id"))?;
    let mut session = state.get_session(&session_id).await?;

    let previous_user_message = session.last_user_message().map(|m| m.content.clone());
    let mut numeric_cache = state.take_numeric_cache(&session_id);

    let outcome = QueryPlanner::plan(
        &body.content,
        previous_user_message.as_deref(),
        &session.uploaded_documents,
        &numeric_cache,
    );

    let reply = if let Some(direct_answer) = outcome.direct_answer {
        direct_answer
    } else {
        let retrieval = Retriever::new(&state.indexer)
            .retrieve(&session_id, &outcome.retrieval_query, outcome.category.is_calculation_like(), &session.uploaded_documents)
            .await
            .map_err(ChatError::from)?;

        match state
            .answerer
            .answer(outcome.category, &body.content, &retrieval, &session.messages, &mut numeric_cache)
            .await
        {
            Ok(reply) => reply,
            Err(ChatError::Llm(e)) => {
                warn!(error = %e, "llm call failed, returning canned apology");
                state.put_numeric_cache(&session_id, numeric_cache);
                session.append_message(MessageRole::User, body.content.clone());
                state.put_session(&session).await?;
                return Ok(Json(PostMessageResponse { reply: archivist_chat::Answerer::canned_apology().to_string() }));
            }
            Err(other) => return Err(other.into()),
        }
    };

    session.append_message(MessageRole::User, body.content.clone());
    session.append_message(MessageRole::Assistant, reply.clone());
    state.put_session(&session).await?;
    state.put_numeric_cache(&session_id, numeric_cache);

    Ok(Json(PostMessageResponse { reply }))
}

pub async fn link_task(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<LinkTaskRequest>,
) -> Result<Json<LinkTaskResponse>, ApiError> {
    let session_id = parse_session_id(&session_id).ok_or_else(|| ApiError::validation("invalid session id"))?;
    let task_id = parse_task_id(&body.task_id).ok_or_else(|| ApiError::validation("invalid task id"))?;
    let mut session = state.get_session(&session_id).await?;

    let task = state.task_controller.get_task(&task_id).await?;

    session.crawl_tasks.push(task_id.clone());
    session.processing_status = SessionProcessingStatus::Processing;
    state.put_session(&session).await?;

    let mut linked = 0usize;
    for doc_id in &task.result {
        if let Err(e) = state.index_task_document(&session_id, &task.user_id, &task_id, doc_id).await {
            warn!(error = %e, %doc_id, "failed to index linked document, skipping");
            continue;
        }
        linked += 1;
    }

    session.document_count += linked as u32;
    session.processing_status = SessionProcessingStatus::Completed;
    state.put_session(&session).await?;

    Ok(Json(LinkTaskResponse { linked_documents: linked }))
}

pub async fn upload(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let session_id = parse_session_id(&session_id).ok_or_else(|| ApiError::validation("invalid session id"))?;
    let mut session = state.get_session(&session_id).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| ApiError::validation("expected one file field"))?;

    let filename = field.file_name().unwrap_or("upload.bin").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::validation(format!("failed to read upload: {e}")))?;

    let doc_id = doc_id_for_url(&format!("upload:{}:{}", session_id, filename));
    let content_type = content_type_from_filename(&filename);

    state
        .object_store
        .put_uploaded_document(&session.user_id, doc_id.as_str(), &filename, bytes.to_vec())
        .await
        .map_err(ApiError::from)?;

    // The document is still stored and indexed even when it's corrupt; a
    // system message tells the user why its answers will be empty (spec
    // §8 scenario 6).
    if content_type == ContentType::Pdf {
        if let Some(_reason) = detect_corruption(&bytes) {
            session.append_message(
                MessageRole::System,
                format!("PDF content could not be extracted from {filename}. This PDF appears to be corrupted or damaged."),
            );
        }
    }

    state
        .index_uploaded_document(&session_id, &session.user_id, &doc_id, &filename, content_type, &bytes)
        .await?;

    session.uploaded_documents.push(filename.clone());
    session.document_count += 1;
    state.put_session(&session).await?;

    Ok(Json(UploadResponse { doc_id: doc_id.to_string(), filename }))
}
