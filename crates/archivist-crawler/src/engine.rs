//! Crawler Engine (spec §4.3): BFS over one seed URL, bounded by
//! `max_depth`/`max_documents`/`max_pages`, fanned out across a worker
//! pool pulling from a shared bounded queue.

use crate::classify::{classify, html_looks_incomplete};
use crate::progress::{emit, ProgressEvent, ProgressSender};
use crate::queue::{bounded_queue, WorkItem};
use crate::visited::VisitedUrls;
use archivist_extract::link_extractor::extract_links;
use archivist_extract::ocr::render::PdfRenderer;
use archivist_extract::OcrProvider;
use archivist_proxy::{FetchOptions, ProxyGateway};
use archivist_storage::ObjectStoreAdapter;
use archivist_types::{doc_id_for_url, now, CrawlTask, DocumentMetadata, ProxyMode, TaskStatus};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use url::Url;

/// Sub-page links enqueued per crawled HTML page (spec §4.3 step 3f:
/// "append up to 10 sub-page links").
const MAX_SUBPAGE_LINKS_PER_PAGE: usize = 10;
/// Document links enqueued per page; these are dispatched ahead of page
/// links but are still bounded so one link-rich page can't flood the
/// queue past the task's own document quota.
const MAX_DOCUMENT_LINKS_PER_PAGE: usize = 20;

pub struct CrawlerEngine {
    proxy: Arc<ProxyGateway>,
    store: Arc<ObjectStoreAdapter>,
    ocr: Arc<dyn OcrProvider>,
    renderer: Arc<dyn PdfRenderer>,
}

impl CrawlerEngine {
    pub fn new(
        proxy: Arc<ProxyGateway>,
        store: Arc<ObjectStoreAdapter>,
        ocr: Arc<dyn OcrProvider>,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self { proxy, store, ocr, renderer }
    }

    /// Run one crawl task to completion (spec §4.3 "The engine stops when
    /// queue is empty, quota met, or cancellation signalled").
    #[instrument(skip(self, task, progress, cancel))]
    pub async fn run(&self, task: Arc<Mutex<CrawlTask>>, progress: ProgressSender, cancel: CancellationToken) {
        let (config, seed_url, user_id, task_id) = {
            let t = task.lock().await;
            (t.config.clone(), t.seed_url.clone(), t.user_id.clone(), t.task_id.clone())
        };
        tracing::Span::current().record("task_id", tracing::field::display(&task_id));

        {
            let mut t = task.lock().await;
            t.transition(TaskStatus::Running);
        }

        let (tx, rx) = bounded_queue(config.max_threads.max(1));
        let visited = Arc::new(VisitedUrls::new());
        let quota_hit = Arc::new(AtomicBool::new(false));
        let batch_counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        visited.mark(&seed_url);
        let _ = tx
            .send(WorkItem { url: seed_url, depth: 0, is_document: false })
            .await;

        let worker_count = config.max_threads.max(1);
        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let rx = rx.clone();
            let tx = tx.clone();
            let visited = visited.clone();
            let quota_hit = quota_hit.clone();
            let task = task.clone();
            let progress = progress.clone();
            let cancel = cancel.clone();
            let engine = self.clone_handles();
            let config = config.clone();
            let user_id = user_id.clone();
            let task_id = task_id.clone();
            let batch_counter = batch_counter.clone();

            handles.push(tokio::spawn(async move {
                engine
                    .worker_loop(
                        rx, tx, visited, quota_hit, task, progress, cancel, config, user_id, task_id, batch_counter,
                    )
                    .await;
            }));
        }
        drop(tx);
        drop(rx);

        for handle in handles {
            let _ = handle.await;
        }

        let final_status = if cancel.is_cancelled() {
            TaskStatus::Cancelled
        } else {
            TaskStatus::Completed
        };
        {
            let mut t = task.lock().await;
            t.transition(final_status);
        }
        emit(&progress, ProgressEvent::TaskFinished { task_id }).await;
    }

    fn clone_handles(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
            store: self.store.clone(),
            ocr: self.ocr.clone(),
            renderer: self.renderer.clone(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn worker_loop(
        &self,
        rx: crate::queue::WorkReceiver,
        tx: crate::queue::WorkSender,
        visited: Arc<VisitedUrls>,
        quota_hit: Arc<AtomicBool>,
        task: Arc<Mutex<CrawlTask>>,
        progress: ProgressSender,
        cancel: CancellationToken,
        config: archivist_types::CrawlConfig,
        user_id: String,
        task_id: archivist_types::TaskId,
        batch_counter: Arc<std::sync::atomic::AtomicUsize>,
    ) {
        loop {
            if cancel.is_cancelled() || quota_hit.load(Ordering::Relaxed) {
                break;
            }

            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                item = rx.recv() => item,
            };
            let Ok(item) = item else { break };

            if item.depth > config.max_depth {
                continue;
            }

            {
                let t = task.lock().await;
                if t.quota_reached() {
                    quota_hit.store(true, Ordering::Relaxed);
                    break;
                }
            }

            self.process_one(&item, &tx, &visited, &task, &progress, &cancel, &config, &user_id, &task_id)
                .await;

            // Pace batches of `max_threads` downloads to reduce per-host
            // rate-limit hits (spec §4.3 "Per-batch inter-request delay").
            let completed = batch_counter.fetch_add(1, Ordering::Relaxed) + 1;
            if completed % config.max_threads.max(1) == 0 && !config.batch_delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(config.batch_delay) => {}
                    _ = cancel.cancelled() => break,
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn process_one(
        &self,
        item: &WorkItem,
        tx: &crate::queue::WorkSender,
        visited: &Arc<VisitedUrls>,
        task: &Arc<Mutex<CrawlTask>>,
        progress: &ProgressSender,
        cancel: &CancellationToken,
        config: &archivist_types::CrawlConfig,
        user_id: &str,
        task_id: &archivist_types::TaskId,
    ) {
        let opts = FetchOptions::default();
        let fetch_result = self.proxy.fetch(&item.url, opts, cancel.clone()).await;

        let mut response = match fetch_result {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url = %item.url, error = %e, "fetch failed");
                let mut t = task.lock().await;
                t.failed_urls.push(archivist_types::FailedUrl {
                    url: item.url.clone(),
                    reason: e.to_string(),
                });
                drop(t);
                emit(
                    progress,
                    ProgressEvent::UrlFailed { task_id: task_id.clone(), url: item.url.clone(), reason: e.to_string() },
                )
                .await;
                return;
            }
        };

        let mut content_type = classify(&item.url, &response.headers);

        // Retry once with JS rendering if the HTML looks incomplete (spec
        // §4.3 step 3d).
        if content_type == archivist_types::ContentType::Html && html_looks_incomplete(&response.body) {
            let js_opts = FetchOptions::default().with_force_mode(ProxyMode::Standard);
            if let Ok(retried) = self.proxy.fetch(&item.url, js_opts, cancel.clone()).await {
                response = retried;
                content_type = classify(&item.url, &response.headers);
            }
        }

        let extracted = archivist_extract::extract_text(
            content_type,
            &response.body,
            filename_for(&item.url, content_type),
            self.ocr.as_ref(),
            self.renderer.as_ref(),
        )
        .await;

        let doc_id = doc_id_for_url(&item.url);
        let domain = Url::parse(&item.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();

        let title = if content_type == archivist_types::ContentType::Html {
            archivist_extract::extract_title(&String::from_utf8_lossy(&response.body))
        } else {
            None
        };

        let metadata = DocumentMetadata {
            doc_id: doc_id.clone(),
            url: item.url.clone(),
            title,
            content_type,
            content_length: extracted.text.len() as u64,
            raw_content_length: response.body.len() as u64,
            fetched_at: now(),
            status_code: Some(response.status),
            headers: response.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<BTreeMap<_, _>>(),
            domain: domain.clone(),
            filename: filename_for(&item.url, content_type).to_string(),
            stored_at: now(),
            body_key: String::new(),
            metadata_key: String::new(),
            user_id: user_id.to_string(),
            task_id: task_id.clone(),
        };

        let store_result = self
            .store
            .put_crawled_document(user_id, task_id, &doc_id, content_type, response.body.clone(), &metadata)
            .await;

        if let Err(e) = store_result {
            warn!(url = %item.url, error = %e, "failed to persist crawled document");
            let mut t = task.lock().await;
            t.failed_urls.push(archivist_types::FailedUrl { url: item.url.clone(), reason: e.to_string() });
            return;
        }

        let progress_snapshot = {
            let mut t = task.lock().await;
            t.progress.pages_crawled += 1;
            // `record_document` only accepts the document while the
            // quota isn't reached yet; gate the counter the same way so
            // `documents_found` can't outrun `max_documents` when several
            // workers pass the check concurrently (spec §3 guarantee (c)).
            let within_quota = t.progress.documents_downloaded < t.config.max_documents;
            t.record_document(doc_id.clone());
            if within_quota {
                t.progress.documents_found += 1;
            }
            t.progress.clone()
        };
        emit(
            progress,
            ProgressEvent::DocumentStored { task_id: task_id.clone(), doc_id, progress: progress_snapshot },
        )
        .await;

        if content_type == archivist_types::ContentType::Html && item.depth < config.max_depth {
            let text = String::from_utf8_lossy(&response.body);
            let links = extract_links(&text, &item.url);

            for doc_link in links.document_links.into_iter().take(MAX_DOCUMENT_LINKS_PER_PAGE) {
                if visited.mark(&doc_link) {
                    let _ = tx
                        .send(WorkItem { url: doc_link, depth: item.depth + 1, is_document: true })
                        .await;
                }
            }
            for page_link in links.page_links.into_iter().take(MAX_SUBPAGE_LINKS_PER_PAGE) {
                if visited.mark(&page_link) {
                    let _ = tx
                        .send(WorkItem { url: page_link, depth: item.depth + 1, is_document: false })
                        .await;
                }
            }
        }

        info!(url = %item.url, ?content_type, "crawled document stored");
    }
}

fn filename_for(url: &str, content_type: archivist_types::ContentType) -> &str {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && s.contains('.'))
        .unwrap_or(content_type.default_extension())
}
