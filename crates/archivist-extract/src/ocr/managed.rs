//! HTTP client for a managed OCR provider (modeled on AWS Textract's
//! `DetectDocumentText` / `AnalyzeDocument` APIs, grounded on
//! `aws_textract_service.py::_detect_document_text` /
//! `_analyze_document`). The wire format below is intentionally generic
//! (detect vs. analyze, `Blocks: [...]`) rather than tied to one vendor's
//! SDK types, since the vendor is an opaque external collaborator
//! (spec §1).

use super::blocks::{Block, BlockType, EntityType};
use super::{wants_form_aware_api, OcrError, OcrProvider, SYNC_OCR_MAX_BYTES};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub struct ManagedOcrClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ManagedOcrClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client build"),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    async fn call(&self, body_b64: String, form_aware: bool) -> Result<Vec<Block>, OcrError> {
        let payload = serde_json::json!({
            "document": body_b64,
            "feature_types": if form_aware { vec!["TABLES", "FORMS"] } else { vec![] },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| OcrError::Provider(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            return Err(OcrError::UnsupportedDocumentType);
        }
        if !response.status().is_success() {
            return Err(OcrError::Provider(format!(
                "managed OCR returned {}",
                response.status()
            )));
        }

        let parsed: RawDocumentResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Provider(e.to_string()))?;
        Ok(parsed.blocks.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl OcrProvider for ManagedOcrClient {
    async fn detect_document(&self, bytes: &[u8], filename: &str) -> Result<String, OcrError> {
        if bytes.len() > SYNC_OCR_MAX_BYTES {
            return Err(OcrError::TooLarge(bytes.len()));
        }
        let form_aware = wants_form_aware_api(filename);
        let body_b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        let blocks = self.call(body_b64, form_aware).await?;
        Ok(super::reconstruct_from_blocks(blocks))
    }

    async fn detect_page_image(&self, png_bytes: &[u8]) -> Result<String, OcrError> {
        let body_b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes);
        let blocks = self.call(body_b64, false).await?;
        Ok(super::reconstruct_from_blocks(blocks))
    }
}

#[derive(Debug, Deserialize)]
struct RawDocumentResponse {
    #[serde(rename = "Blocks")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "BlockType")]
    block_type: String,
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "Page", default)]
    page: u32,
    #[serde(rename = "RowIndex")]
    row_index: Option<u32>,
    #[serde(rename = "ColumnIndex")]
    column_index: Option<u32>,
    #[serde(rename = "EntityTypes", default)]
    entity_types: Vec<String>,
    #[serde(rename = "Relationships", default)]
    relationships: Vec<RawRelationship>,
    #[serde(rename = "Top", default)]
    top: f32,
}

#[derive(Debug, Deserialize)]
struct RawRelationship {
    #[serde(rename = "Type")]
    rel_type: String,
    #[serde(rename = "Ids")]
    ids: Vec<String>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let block_type = match raw.block_type.as_str() {
            "PAGE" => BlockType::Page,
            "LINE" => BlockType::Line,
            "WORD" => BlockType::Word,
            "TABLE" => BlockType::Table,
            "CELL" => BlockType::Cell,
            "KEY_VALUE_SET" => BlockType::KeyValueSet,
            other => {
                tracing::warn!(block_type = other, "unknown OCR block type, treating as line");
                BlockType::Line
            }
        };
        let entity_types = raw
            .entity_types
            .iter()
            .filter_map(|e| match e.as_str() {
                "KEY" => Some(EntityType::Key),
                "VALUE" => Some(EntityType::Value),
                _ => None,
            })
            .collect();
        let mut child_ids = Vec::new();
        let mut value_ids = Vec::new();
        for rel in raw.relationships {
            match rel.rel_type.as_str() {
                "CHILD" => child_ids.extend(rel.ids),
                "VALUE" => value_ids.extend(rel.ids),
                _ => {}
            }
        }
        Block {
            id: raw.id,
            block_type,
            text: raw.text,
            page: raw.page,
            row_index: raw.row_index,
            column_index: raw.column_index,
            entity_types,
            child_ids,
            value_ids,
            top: raw.top,
        }
    }
}
