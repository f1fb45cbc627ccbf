//! Worker dispatch payload (spec §6.2: "the control plane enqueues one
//! message on a job queue with payload `{task_id, url, config, user_id}`").

use archivist_types::{CrawlConfig, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    pub task_id: TaskId,
    pub url: String,
    pub config: CrawlConfig,
    pub user_id: String,
}
