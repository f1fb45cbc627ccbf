use crate::ids::TaskId;
use crate::{now, DocId, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle states of a `CrawlTask` (spec §3). Terminal states are
/// `Completed`, `Failed`, `Cancelled`; once terminal no further mutation is
/// permitted (spec §3 invariant, tested in archivist-worker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Whether `self -> next` is an allowed transition (spec §3: "status
    /// monotonic except created->{running,cancelled} and
    /// running->{completed,failed,cancelled}").
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (Created, Running) | (Created, Cancelled) => true,
            (Running, Completed) | (Running, Failed) | (Running, Cancelled) => true,
            (a, b) if a == b => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub max_documents: u32,
    pub max_depth: u32,
    pub max_pages: u32,
    pub render_js: bool,
    pub max_threads: usize,
    #[serde(with = "duration_secs")]
    pub total_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Delay between successive batches of `max_threads` downloads, to
    /// reduce per-host rate-limit hits (spec §4.3, §5 "Worker pool
    /// sizing").
    #[serde(with = "duration_secs")]
    pub batch_delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_documents: 20,
            max_depth: 2,
            max_pages: 50,
            render_js: false,
            max_threads: 3,
            total_timeout: Duration::from_secs(600),
            request_timeout: Duration::from_secs(20),
            batch_delay: Duration::from_secs(3),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlProgress {
    pub documents_found: u32,
    pub documents_downloaded: u32,
    pub pages_crawled: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlTask {
    pub task_id: TaskId,
    pub user_id: String,
    pub seed_url: String,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub config: CrawlConfig,
    pub progress: CrawlProgress,
    pub result: Vec<DocId>,
    pub failed_urls: Vec<FailedUrl>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

impl CrawlTask {
    pub fn new(user_id: String, seed_url: String, config: CrawlConfig) -> Self {
        let ts = now();
        Self {
            task_id: TaskId::new(),
            user_id,
            seed_url,
            status: TaskStatus::Created,
            created_at: ts,
            updated_at: ts,
            config,
            progress: CrawlProgress::default(),
            result: Vec::new(),
            failed_urls: Vec::new(),
            error: None,
        }
    }

    /// Attempt a status transition, enforcing the monotonicity invariant.
    /// Returns `false` (a no-op) if the task is already terminal, matching
    /// spec §8 "Starting an already-terminal task is a no-op".
    pub fn transition(&mut self, next: TaskStatus) -> bool {
        if self.status.is_terminal() {
            return self.status == next;
        }
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at = now();
        true
    }

    /// Record a downloaded document, enforcing `documents_downloaded <=
    /// max_documents` (spec §8 property 1).
    pub fn record_document(&mut self, doc_id: DocId) {
        if self.progress.documents_downloaded < self.config.max_documents {
            self.progress.documents_downloaded += 1;
            self.result.push(doc_id);
        }
        self.updated_at = now();
    }

    pub fn quota_reached(&self) -> bool {
        self.progress.documents_downloaded >= self.config.max_documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_transition_is_noop() {
        let mut t = CrawlTask::new("u".into(), "http://x".into(), CrawlConfig::default());
        assert!(t.transition(TaskStatus::Running));
        assert!(t.transition(TaskStatus::Completed));
        // re-starting a terminal task is a no-op that keeps state
        assert!(t.transition(TaskStatus::Completed));
        assert!(!t.transition(TaskStatus::Running));
        assert_eq!(t.status, TaskStatus::Completed);
    }

    #[test]
    fn documents_downloaded_never_exceeds_quota() {
        let mut cfg = CrawlConfig::default();
        cfg.max_documents = 1;
        let mut t = CrawlTask::new("u".into(), "http://x".into(), cfg);
        t.record_document(DocId::from_hex("aaaaaaaaaaaaaaaa".into()));
        t.record_document(DocId::from_hex("bbbbbbbbbbbbbbbb".into()));
        assert_eq!(t.progress.documents_downloaded, 1);
        assert!(t.quota_reached());
    }
}
