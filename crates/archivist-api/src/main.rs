//! Control-plane binary (spec §5 "a control-plane process that exposes
//! the public API and a fleet of crawler-worker processes"): wires every
//! subsystem together, starts the in-process Dispatcher alongside the
//! HTTP server, and serves the routes in [`archivist_api::build_router`].

use archivist_api::state::AppState;
use archivist_chat::{Answerer, AnswererConfig, HttpLlmProvider};
use archivist_crawler::CrawlerEngine;
use archivist_extract::ocr::managed::ManagedOcrClient;
use archivist_extract::ocr::render::NoRenderer;
use archivist_index::{HttpVectorStoreProvider, VectorIndexer};
use archivist_proxy::{ProxyGateway, ScrapingProxyBackend};
use archivist_storage::{BlobStore, ObjectStoreAdapter, RecordStore};
use archivist_worker::{CancellationRegistry, Dispatcher, InProcessJobQueue, TaskController};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "archivist-api")]
#[command(about = "Public HTTP API: crawl task control and chat session endpoints")]
struct Args {
    #[arg(long, env = "ARCHIVIST_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "BLOB_STORE_PATH", default_value = "./data/blobs")]
    blob_store_path: String,

    #[arg(long, env = "PROXY_API_KEY")]
    proxy_api_key: String,

    #[arg(long, env = "OCR_ENDPOINT")]
    ocr_endpoint: Option<String>,

    #[arg(long, env = "OCR_API_KEY")]
    ocr_api_key: Option<String>,

    #[arg(long, env = "VECTOR_STORE_ENDPOINT")]
    vector_store_endpoint: String,

    #[arg(long, env = "VECTOR_STORE_API_KEY")]
    vector_store_api_key: String,

    #[arg(long, env = "JOB_QUEUE_CAPACITY", default_value_t = 256)]
    job_queue_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&args.database_url)
        .await?;
    let pool = Arc::new(pool);
    let records = RecordStore::new(pool);

    let blobs = BlobStore::local(&args.blob_store_path)?;
    let object_store = Arc::new(ObjectStoreAdapter::new(blobs));

    let proxy_backend = Arc::new(ScrapingProxyBackend::new(args.proxy_api_key, None));
    let proxy = Arc::new(ProxyGateway::new(proxy_backend));

    let ocr_endpoint = args.ocr_endpoint.unwrap_or_else(|| "https://ocr.archivist.invalid/v1".to_string());
    let ocr_api_key = args.ocr_api_key.unwrap_or_else(|| "unset".to_string());
    let ocr: Arc<dyn archivist_extract::OcrProvider> = Arc::new(ManagedOcrClient::new(ocr_endpoint, ocr_api_key));
    let renderer: Arc<dyn archivist_extract::ocr::render::PdfRenderer> = Arc::new(NoRenderer);

    let crawler_engine = Arc::new(CrawlerEngine::new(proxy, object_store.clone(), ocr.clone(), renderer.clone()));

    let vector_provider = Arc::new(HttpVectorStoreProvider::new(
        args.vector_store_endpoint,
        args.vector_store_api_key,
    ));
    let indexer = Arc::new(VectorIndexer::new(vector_provider, records.clone()));

    let llm_config = AnswererConfig::from_env()?;
    let llm_provider = Arc::new(HttpLlmProvider::new(
        llm_config.endpoint.clone(),
        llm_config.api_key.clone(),
    ));
    let answerer = Arc::new(Answerer::new(llm_provider, llm_config));

    let (queue, job_receiver) = InProcessJobQueue::new(args.job_queue_capacity);
    let cancellations: CancellationRegistry = Arc::new(dashmap::DashMap::new());
    let task_controller = Arc::new(TaskController::new(records.clone(), Arc::new(queue), cancellations.clone()));

    let dispatcher = Arc::new(Dispatcher::new(crawler_engine, records.clone(), cancellations));
    tokio::spawn(dispatcher.run(job_receiver));

    let state = AppState::new(task_controller, object_store, indexer, answerer, ocr, renderer, records);

    let app = archivist_api::build_router(state);

    let addr: SocketAddr = args.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(bind_address = %addr, "archivist-api listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("archivist-api shutdown complete");
    Ok(())
}

/// Graceful shutdown on SIGTERM/SIGINT (spec §5 scheduling model: a
/// long-running control-plane process).
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
