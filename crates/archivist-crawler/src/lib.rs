//! Crawler Engine (spec §4.3): walks a seed URL breadth-first through the
//! Proxy Gateway, Content-Text Extractor, and Object Store Adapter, bounded
//! by depth, document count, and a worker pool sized by `CrawlConfig`.

pub mod classify;
pub mod engine;
pub mod error;
pub mod progress;
pub mod queue;
pub mod visited;

pub use engine::CrawlerEngine;
pub use error::CrawlerError;
pub use progress::{ProgressEvent, ProgressSender};
pub use queue::WorkItem;
