//! Task Controller and dispatch fleet (spec §4.10): CrawlTask lifecycle
//! persistence, job dispatch onto an in-process queue, and the Dispatcher
//! loop that runs the Crawler Engine per job and reports results back to
//! the metadata store.

pub mod controller;
pub mod error;
pub mod job;
pub mod queue;
pub mod worker;

pub use controller::{CancellationRegistry, TaskController, CRAWL_TASKS_TABLE};
pub use error::WorkerError;
pub use job::CrawlJob;
pub use queue::{InProcessJobQueue, JobQueue};
pub use worker::Dispatcher;
