//! In-process job dispatch queue (spec §4.10, §6.2), grounded on the
//! teacher's `riptide-workers::queue::JobQueue` shape but backed by
//! `tokio::sync::mpsc` instead of Redis: this pipeline runs crawler
//! workers in the same process as the control plane, and the metadata
//! store (not a separate broker) is what gives crash-recovery visibility
//! into pending/in-flight tasks.

use crate::error::WorkerError;
use crate::job::CrawlJob;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Abstracts job submission so the Task Controller doesn't know whether
/// dispatch is in-process or, eventually, broker-backed.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit(&self, job: CrawlJob) -> Result<(), WorkerError>;
}

/// `tokio::sync::mpsc`-backed queue. Bounded capacity gives the same
/// backpressure-on-submit behavior as the teacher's Redis-backed queue,
/// without the external dependency.
pub struct InProcessJobQueue {
    sender: mpsc::Sender<CrawlJob>,
}

impl InProcessJobQueue {
    /// Returns the queue handle plus the receiver half the Dispatcher
    /// consumes from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CrawlJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl JobQueue for InProcessJobQueue {
    async fn submit(&self, job: CrawlJob) -> Result<(), WorkerError> {
        self.sender.send(job).await.map_err(|_| WorkerError::QueueClosed)
    }
}
