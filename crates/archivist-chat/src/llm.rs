//! LLM provider port (spec §4.9). Slimmed from the teacher's
//! `riptide-intelligence::provider::LlmProvider` to the one operation
//! this pipeline needs: `complete()`. Embeddings are the vector-store
//! provider's job (`archivist_index::provider::VectorStoreProvider`),
//! not this trait's.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub id: Uuid,
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, max_tokens: u32, temperature: f32) -> Self {
        Self { id: Uuid::new_v4(), model: model.into(), messages, max_tokens, temperature }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub request_id: Uuid,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response had no completion choices")]
    EmptyResponse,
}

/// Core trait every LLM backend implements (spec §4.9: one request/
/// response cycle per turn, no streaming).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Generic chat-completions HTTP provider (OpenAI-compatible wire shape),
/// following the teacher's `reqwest`-client-per-provider idiom in
/// `riptide-search/src/providers.rs`.
pub struct HttpLlmProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpLlmProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into(), api_key: api_key.into() }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    content: String,
}

fn role_str(role: &Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl LlmProvider for HttpLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let wire = WireRequest {
            model: &request.model,
            messages: request.messages.iter().map(|m| WireMessage { role: role_str(&m.role), content: &m.content }).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&wire)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Http { status, body });
        }

        let body: WireResponse = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(CompletionResponse { request_id: request.id, content })
    }
}

/// Env-driven LLM configuration (spec §4.9's enumerated config surface).
/// A small direct `std::env::var` reader rather than a generic loader
/// abstraction: four fields don't justify standing up the teacher's
/// `EnvConfigLoader` machinery from `riptide-config/src/env.rs` for a
/// single consumer.
#[derive(Debug, Clone)]
pub struct AnswererConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub api_key: String,
    pub endpoint: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for environment variable {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl AnswererConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let endpoint = env::var("LLM_ENDPOINT").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let max_tokens = match env::var("LLM_MAX_TOKENS") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid { var: "LLM_MAX_TOKENS", reason: format!("{v:?} is not a valid u32") })?,
            Err(_) => 4000,
        };
        let temperature = match env::var("LLM_TEMPERATURE") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid { var: "LLM_TEMPERATURE", reason: format!("{v:?} is not a valid f32") })?,
            Err(_) => 0.1,
        };
        let api_key = env::var("LLM_API_KEY").map_err(|_| ConfigError::Missing("LLM_API_KEY"))?;

        Ok(Self { model, max_tokens, temperature, api_key, endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_str_matches_wire_vocabulary() {
        assert_eq!(role_str(&Role::System), "system");
        assert_eq!(role_str(&Role::User), "user");
        assert_eq!(role_str(&Role::Assistant), "assistant");
    }
}
