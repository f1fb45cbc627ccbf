//! `VectorStoreProvider` port (spec §4.6): the opaque third-party vector
//! store sits behind one `async-trait`, following the teacher's pluggable
//! backend idiom in `riptide-search/src/providers.rs` (API-key-
//! authenticated `reqwest` client per provider) and
//! `riptide-intelligence/src/provider.rs` (registry of swappable
//! backends behind a single trait).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("vector store request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store not found: {0}")]
    StoreNotFound(String),
    #[error("file not found: {0}")]
    FileNotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreFile {
    pub file_id: String,
    pub filename: String,
    pub status: FileIndexStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileIndexStatus {
    Indexing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub file_id: String,
    pub filename: String,
    pub score: f32,
    pub content_chunks: Vec<String>,
}

/// Backend-agnostic vector store contract: create a store, upload text
/// as a file with attributes, search, delete, list, stats (spec §4.6).
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    async fn create_store(&self, name: &str) -> Result<String, VectorStoreError>;

    async fn upload_file(
        &self,
        store_id: &str,
        filename: &str,
        text: &str,
        attributes: &serde_json::Value,
    ) -> Result<String, VectorStoreError>;

    async fn search(
        &self,
        store_id: &str,
        query: &str,
        max_results: u32,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, VectorStoreError>;

    async fn delete_file(&self, store_id: &str, file_id: &str) -> Result<(), VectorStoreError>;

    async fn list_files(&self, store_id: &str) -> Result<Vec<VectorStoreFile>, VectorStoreError>;
}

/// HTTP-backed provider for a generic vector-store API exposing
/// `/stores`, `/stores/{id}/files`, `/stores/{id}/search` endpoints with
/// bearer auth, the same request shape as the teacher's
/// `SerperProvider`/`ManagedOcrClient` adapters.
pub struct HttpVectorStoreProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpVectorStoreProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, VectorStoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(VectorStoreError::Http { status, body })
        }
    }
}

#[async_trait]
impl VectorStoreProvider for HttpVectorStoreProvider {
    async fn create_store(&self, name: &str) -> Result<String, VectorStoreError> {
        let resp = self
            .client
            .post(format!("{}/stores", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: serde_json::Value = resp.json().await?;
        Ok(body["id"].as_str().unwrap_or_default().to_string())
    }

    async fn upload_file(
        &self,
        store_id: &str,
        filename: &str,
        text: &str,
        attributes: &serde_json::Value,
    ) -> Result<String, VectorStoreError> {
        let resp = self
            .client
            .post(format!("{}/stores/{store_id}/files", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "filename": filename,
                "text": text,
                "attributes": attributes,
            }))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: serde_json::Value = resp.json().await?;
        Ok(body["file_id"].as_str().unwrap_or_default().to_string())
    }

    async fn search(
        &self,
        store_id: &str,
        query: &str,
        max_results: u32,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let resp = self
            .client
            .post(format!("{}/stores/{store_id}/search", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "query": query,
                "max_results": max_results,
                "threshold": threshold,
            }))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let hits: Vec<SearchHit> = resp.json().await?;
        Ok(hits)
    }

    async fn delete_file(&self, store_id: &str, file_id: &str) -> Result<(), VectorStoreError> {
        let resp = self
            .client
            .delete(format!("{}/stores/{store_id}/files/{file_id}", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_files(&self, store_id: &str) -> Result<Vec<VectorStoreFile>, VectorStoreError> {
        let resp = self
            .client
            .get(format!("{}/stores/{store_id}/files", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let files: Vec<VectorStoreFile> = resp.json().await?;
        Ok(files)
    }
}
