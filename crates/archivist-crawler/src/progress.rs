//! Progress delivery to the Task Controller (spec §4.3: "delivered on
//! every state change ... via a channel-like sink; delivery is
//! at-least-once"). A bounded `tokio::mpsc` channel gives exactly that:
//! a slow consumer applies backpressure to the crawler rather than
//! dropping events, and a dropped receiver just makes sends no-ops.

use archivist_types::{CrawlProgress, DocId, TaskId};

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    DocumentStored { task_id: TaskId, doc_id: DocId, progress: CrawlProgress },
    UrlFailed { task_id: TaskId, url: String, reason: String },
    TaskFinished { task_id: TaskId },
}

pub type ProgressSender = tokio::sync::mpsc::Sender<ProgressEvent>;

/// Send an event, ignoring a disconnected receiver — at-least-once
/// delivery from the crawler's point of view means "don't let a closed
/// channel abort the crawl", not "guarantee the controller saw it".
pub async fn emit(sink: &ProgressSender, event: ProgressEvent) {
    let _ = sink.send(event).await;
}
