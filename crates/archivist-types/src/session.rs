use crate::ids::{SessionId, TaskId};
use crate::{now, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionProcessingStatus {
    Idle,
    Processing,
    Completed,
    Error,
}

/// Query-answer context (spec §3 Session). Messages are append-only and
/// totally ordered by insertion (spec §5 ordering guarantee); append is
/// single-writer per session, enforced by callers serializing on
/// `session_id` (spec §3 Ownership).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub messages: Vec<ChatMessage>,
    pub crawl_tasks: Vec<TaskId>,
    pub uploaded_documents: Vec<String>,
    pub document_count: u32,
    pub processing_status: SessionProcessingStatus,
    pub vector_store_id: Option<String>,
}

impl Session {
    pub fn new(user_id: String) -> Self {
        let ts = now();
        Self {
            session_id: SessionId::new(),
            user_id,
            created_at: ts,
            updated_at: ts,
            messages: Vec::new(),
            crawl_tasks: Vec::new(),
            uploaded_documents: Vec::new(),
            document_count: 0,
            processing_status: SessionProcessingStatus::Idle,
            vector_store_id: None,
        }
    }

    pub fn append_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            timestamp: now(),
        });
        self.updated_at = now();
    }

    /// Last `n` messages, oldest first, used by the Answerer for "Recent
    /// conversation context" (spec §4.9).
    pub fn last_messages(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
    }
}
