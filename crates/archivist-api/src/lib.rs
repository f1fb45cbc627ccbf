//! Public HTTP API (spec §6.1): crawl task control and chat session
//! endpoints over axum, grounded on the teacher's `riptide-api` router
//! and middleware layering, scaled to the much narrower surface this
//! pipeline exposes.

pub mod dto;
pub mod errors;
pub mod handlers;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use state::AppState;
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

async fn healthz() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/crawl/tasks", post(handlers::crawl::create_task))
        .route("/crawl/tasks", get(handlers::crawl::list_tasks))
        .route("/crawl/tasks/:id/start", post(handlers::crawl::start_task))
        .route("/crawl/tasks/:id", get(handlers::crawl::get_task))
        .route("/crawl/tasks/:id", delete(handlers::crawl::delete_task))
        .route("/crawl/tasks/:id/documents", get(handlers::crawl::list_documents))
        .route("/crawl/tasks/:id/documents/:doc_id", get(handlers::crawl::get_document))
        .route("/chat/sessions", post(handlers::chat::create_session))
        .route("/chat/sessions/:id/messages", post(handlers::chat::post_message))
        .route("/chat/sessions/:id/link-task", post(handlers::chat::link_task))
        .route("/chat/sessions/:id/upload", post(handlers::chat::upload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
}
