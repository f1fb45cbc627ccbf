//! Task Controller (spec §4.10): owns `CrawlTask` creation and
//! terminal-on-cancel status, persists lifecycle records to the metadata
//! store, and dispatches start requests onto the job queue. Progress and
//! running-state mutation belongs to the Crawler Engine, via the
//! Dispatcher in `worker.rs`.

use crate::error::WorkerError;
use crate::job::CrawlJob;
use crate::queue::JobQueue;
use archivist_storage::RecordStore;
use archivist_types::{CrawlConfig, CrawlTask, TaskId, TaskStatus};
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

pub const CRAWL_TASKS_TABLE: &str = "crawl_tasks";

/// Registry of cancellation tokens for currently-dispatched tasks, shared
/// between the controller (which trips them) and the Dispatcher (which
/// registers one per in-flight job and checks it).
pub type CancellationRegistry = Arc<DashMap<TaskId, CancellationToken>>;

pub struct TaskController {
    records: RecordStore,
    queue: Arc<dyn JobQueue>,
    cancellations: CancellationRegistry,
}

impl TaskController {
    pub fn new(records: RecordStore, queue: Arc<dyn JobQueue>, cancellations: CancellationRegistry) -> Self {
        Self { records, queue, cancellations }
    }

    #[instrument(skip(self, config))]
    pub async fn create_task(
        &self,
        user_id: String,
        seed_url: String,
        config: CrawlConfig,
    ) -> Result<CrawlTask, WorkerError> {
        let task = CrawlTask::new(user_id, seed_url, config);
        self.records.put(CRAWL_TASKS_TABLE, &task.task_id.to_string(), &task).await?;
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, task_id: &TaskId) -> Result<CrawlTask, WorkerError> {
        self.records
            .get(CRAWL_TASKS_TABLE, &task_id.to_string())
            .await?
            .ok_or_else(|| WorkerError::TaskNotFound(task_id.to_string()))
    }

    /// Newest-first, per spec §6.1 `GET /crawl/tasks`.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<CrawlTask>, WorkerError> {
        let mut tasks: Vec<CrawlTask> = self.records.list(CRAWL_TASKS_TABLE).await?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    /// Transitions the task to `running` and enqueues its dispatch job
    /// (spec §6.1 `POST /crawl/tasks/{id}/start`, §6.2 dispatch protocol).
    #[instrument(skip(self))]
    pub async fn start_task(&self, task_id: &TaskId) -> Result<CrawlTask, WorkerError> {
        let mut task = self.get_task(task_id).await?;
        if task.status.is_terminal() {
            return Err(WorkerError::AlreadyTerminal(task_id.to_string()));
        }
        if !task.transition(TaskStatus::Running) {
            return Err(WorkerError::AlreadyTerminal(task_id.to_string()));
        }
        self.records.put(CRAWL_TASKS_TABLE, &task_id.to_string(), &task).await?;

        let job = CrawlJob {
            task_id: task.task_id.clone(),
            url: task.seed_url.clone(),
            config: task.config.clone(),
            user_id: task.user_id.clone(),
        };
        self.queue.submit(job).await?;
        Ok(task)
    }

    /// Signals cancellation to an in-flight worker if one is running the
    /// task, or marks a not-yet-started task cancelled directly (spec
    /// §4.3 "Task transitions to cancelled only after all workers have
    /// observed the signal").
    #[instrument(skip(self))]
    pub async fn cancel_task(&self, task_id: &TaskId) -> Result<CrawlTask, WorkerError> {
        let mut task = self.get_task(task_id).await?;
        if task.status.is_terminal() {
            return Ok(task);
        }
        if let Some(token) = self.cancellations.get(task_id) {
            token.cancel();
            return Ok(task);
        }
        task.transition(TaskStatus::Cancelled);
        self.records.put(CRAWL_TASKS_TABLE, &task_id.to_string(), &task).await?;
        Ok(task)
    }

    /// Removes the task record and cancels any in-flight run. Deleting
    /// the task's documents from the object store and vector index is
    /// the caller's responsibility (the API handler, which already holds
    /// those handles) before this is called.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), WorkerError> {
        if let Some(token) = self.cancellations.get(task_id) {
            token.cancel();
        }
        self.records.delete(CRAWL_TASKS_TABLE, &task_id.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn already_terminal_maps_to_task_fatal() {
        let err = WorkerError::AlreadyTerminal("x".to_string());
        assert_eq!(err.kind(), archivist_types::ErrorKind::TaskFatal);
    }
}
