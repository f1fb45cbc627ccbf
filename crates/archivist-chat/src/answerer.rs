//! Answerer (spec §4.9): assembles the system prompt, retrieved
//! passages, recent conversation, and the current query into one LLM
//! request, then runs numeric-context extraction over the reply.

use crate::category::QueryCategory;
use crate::error::ChatError;
use crate::llm::{AnswererConfig, CompletionRequest, LlmProvider, Message};
use crate::planner::QueryPlanner;
use crate::prompts::system_prompt;
use archivist_index::retriever::RetrievalOutcome;
use archivist_index::SearchHit;
use archivist_types::{ChatMessage, MessageRole, NumericContextCache};
use std::sync::Arc;
use tracing::{instrument, warn};

const RECENT_MESSAGES: usize = 5;
const CANNED_APOLOGY: &str = "I'm sorry, I wasn't able to generate a response just now. Please try again.";
const STILL_INDEXING_MESSAGE: &str =
    "Your documents are still being indexed. This usually takes 30-60 seconds — please try again shortly.";
const NOTHING_FOUND_MESSAGE: &str =
    "I couldn't find anything relevant to that in the documents available in this session.";

pub struct Answerer {
    llm: Arc<dyn LlmProvider>,
    config: AnswererConfig,
}

impl Answerer {
    pub fn new(llm: Arc<dyn LlmProvider>, config: AnswererConfig) -> Self {
        Self { llm, config }
    }

    /// Produce the assistant reply for one turn. `recent_messages` is the
    /// session's message history *before* this turn's user message is
    /// appended; `numeric_cache` is mutated with any monetary figures the
    /// reply mentions.
    #[instrument(skip(self, recent_messages, numeric_cache))]
    pub async fn answer(
        &self,
        category: QueryCategory,
        query: &str,
        retrieval: &RetrievalOutcome,
        recent_messages: &[ChatMessage],
        numeric_cache: &mut NumericContextCache,
    ) -> Result<String, ChatError> {
        let passages = match retrieval {
            RetrievalOutcome::Passages(hits) => hits.as_slice(),
            RetrievalOutcome::StillIndexing => return Ok(STILL_INDEXING_MESSAGE.to_string()),
            RetrievalOutcome::Empty => return Ok(NOTHING_FOUND_MESSAGE.to_string()),
        };

        let request = self.build_request(category, query, passages, recent_messages);

        let reply = match self.llm.complete(request).await {
            Ok(resp) => resp.content.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "llm completion failed, returning canned apology");
                return Err(ChatError::Llm(e));
            }
        };

        QueryPlanner::record_response(&reply, numeric_cache);
        Ok(reply)
    }

    /// The canned apology string returned on LLM failure (spec §9 "LLM
    /// error: Answerer returns a canned apology string; conversation
    /// history is not mutated with the assistant message on failure").
    pub fn canned_apology() -> &'static str {
        CANNED_APOLOGY
    }

    fn build_request(
        &self,
        category: QueryCategory,
        query: &str,
        passages: &[SearchHit],
        recent_messages: &[ChatMessage],
    ) -> CompletionRequest {
        let mut messages = vec![Message::system(system_prompt(category))];

        let mut document_section = String::from("Document content to analyze:\n");
        for hit in passages {
            for chunk in &hit.content_chunks {
                document_section.push_str(&format!("From {}:\n{}\n\n", hit.filename, chunk));
            }
        }
        messages.push(Message::user(document_section));

        let recent = recent_messages
            .iter()
            .rev()
            .take(RECENT_MESSAGES)
            .collect::<Vec<_>>()
            .into_iter()
            .rev();
        let mut context_section = String::from("Recent conversation context:\n");
        for msg in recent {
            let role = match msg.role {
                MessageRole::User => "User",
                MessageRole::Assistant => "Assistant",
                MessageRole::System => "System",
            };
            context_section.push_str(&format!("{role}: {}\n", msg.content));
        }
        messages.push(Message::user(context_section));

        messages.push(Message::user(query.to_string()));

        CompletionRequest::new(self.config.model.clone(), messages, self.config.max_tokens, self.config.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::QueryCategory;
    use crate::llm::{CompletionResponse, LlmError};
    use async_trait::async_trait;
    use std::time::Duration;

    struct StubLlm {
        reply: String,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse { request_id: request.id, content: self.reply.clone() })
        }
    }

    fn test_config() -> AnswererConfig {
        AnswererConfig {
            model: "test-model".into(),
            max_tokens: 512,
            temperature: 0.1,
            api_key: "test-key".into(),
            endpoint: "http://localhost".into(),
        }
    }

    #[tokio::test]
    async fn still_indexing_short_circuits_before_calling_the_llm() {
        let answerer = Answerer::new(Arc::new(StubLlm { reply: "unused".into() }), test_config());
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        let reply = answerer
            .answer(QueryCategory::General, "anything", &RetrievalOutcome::StillIndexing, &[], &mut cache)
            .await
            .unwrap();
        assert_eq!(reply, STILL_INDEXING_MESSAGE);
    }

    #[tokio::test]
    async fn successful_reply_is_trimmed_and_cached() {
        let answerer = Answerer::new(
            Arc::new(StubLlm { reply: "  Your take-home salary is ₹1,144,180 per year.  ".into() }),
            test_config(),
        );
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        let hit = SearchHit { file_id: "f1".into(), filename: "doc.pdf".into(), score: 0.9, content_chunks: vec!["some text".into()] };
        let reply = answerer
            .answer(QueryCategory::General, "what is my salary", &RetrievalOutcome::Passages(vec![hit]), &[], &mut cache)
            .await
            .unwrap();
        assert_eq!(reply, "Your take-home salary is ₹1,144,180 per year.");
        assert_eq!(cache.get(archivist_types::numeric_cache::TAKE_HOME_SALARY), Some(1_144_180.0));
    }
}
