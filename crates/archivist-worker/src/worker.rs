//! Dispatcher loop (spec §4.10, §6.2): receives `CrawlJob`s off the
//! in-process queue, runs the Crawler Engine for each, and persists
//! progress and final state back to the metadata store. Idempotent with
//! respect to `task_id` — a job for an already-terminal task is a no-op,
//! matching the at-least-once delivery model in spec §6.2.

use crate::controller::{CancellationRegistry, CRAWL_TASKS_TABLE};
use crate::job::CrawlJob;
use archivist_crawler::CrawlerEngine;
use archivist_storage::RecordStore;
use archivist_types::{CrawlTask, TaskId};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, instrument, warn};

pub struct Dispatcher {
    engine: Arc<CrawlerEngine>,
    records: RecordStore,
    cancellations: CancellationRegistry,
}

impl Dispatcher {
    pub fn new(engine: Arc<CrawlerEngine>, records: RecordStore, cancellations: CancellationRegistry) -> Self {
        Self { engine, records, cancellations }
    }

    /// Consumes jobs until the queue's sender half is dropped, running
    /// each one on its own task so a slow crawl doesn't block dispatch of
    /// the next job (spec §5: worker fleet is concurrent, not serial).
    pub async fn run(self: Arc<Self>, mut receiver: mpsc::Receiver<CrawlJob>) {
        while let Some(job) = receiver.recv().await {
            let dispatcher = self.clone();
            tokio::spawn(async move {
                dispatcher.execute(job).await;
            });
        }
    }

    #[instrument(skip(self, job), fields(task_id = %job.task_id))]
    async fn execute(&self, job: CrawlJob) {
        let task_id = job.task_id.clone();

        let task = match self.records.get::<CrawlTask>(CRAWL_TASKS_TABLE, &task_id.to_string()).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                warn!("dispatched job has no matching task record, skipping");
                return;
            }
            Err(e) => {
                error!(error = %e, "failed to load task record for dispatch");
                return;
            }
        };

        if task.status.is_terminal() {
            return;
        }

        let task = Arc::new(Mutex::new(task));
        let cancel = CancellationToken::new();
        self.cancellations.insert(task_id.clone(), cancel.clone());

        let (progress_tx, progress_rx) = mpsc::channel(64);
        let persister = self.spawn_persister(task.clone(), task_id.clone(), progress_rx);

        self.engine.run(task.clone(), progress_tx, cancel).await;
        self.cancellations.remove(&task_id);
        let _ = persister.await;

        let final_state = task.lock().await.clone();
        if let Err(e) = self.records.put(CRAWL_TASKS_TABLE, &task_id.to_string(), &final_state).await {
            error!(error = %e, "failed to persist final task state");
        }
    }

    /// Persists a snapshot of the task on every progress event, so a crash
    /// mid-crawl leaves the metadata store close to the true state rather
    /// than stuck at `created`/`running` with no progress (spec §6.2
    /// "writes results + final status back to the metadata store").
    fn spawn_persister(
        &self,
        task: Arc<Mutex<CrawlTask>>,
        task_id: TaskId,
        mut progress_rx: mpsc::Receiver<archivist_crawler::ProgressEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let records = self.records.clone();
        tokio::spawn(async move {
            while progress_rx.recv().await.is_some() {
                let snapshot = task.lock().await.clone();
                if let Err(e) = records.put(CRAWL_TASKS_TABLE, &task_id.to_string(), &snapshot).await {
                    warn!(error = %e, "failed to persist progress snapshot");
                }
            }
        })
    }
}
