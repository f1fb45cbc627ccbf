//! Bounded work queue (spec §4.3 "Backpressure": capacity proportional to
//! `max_threads x 8`; producers block when full). Built on `async-channel`
//! rather than `tokio::sync::mpsc` so both the producer (link-extraction
//! results) and the worker pool can hold cloned receivers/senders freely.

#[derive(Debug, Clone)]
pub struct WorkItem {
    pub url: String,
    pub depth: u32,
    /// Document links are dispatched ahead of sub-page links (spec §4.3
    /// step 3f: "preferred over pages").
    pub is_document: bool,
}

pub type WorkSender = async_channel::Sender<WorkItem>;
pub type WorkReceiver = async_channel::Receiver<WorkItem>;

pub fn bounded_queue(max_threads: usize) -> (WorkSender, WorkReceiver) {
    let capacity = (max_threads * 8).max(8);
    async_channel::bounded(capacity)
}
