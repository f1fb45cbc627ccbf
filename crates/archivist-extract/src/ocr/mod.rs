//! Managed OCR abstraction (spec §4.4). One `async-trait` port with two
//! concrete call shapes (plain text detection vs. form-aware analysis),
//! and a block-graph reconstruction step shared by both.

pub mod blocks;
pub mod managed;
pub mod render;

use async_trait::async_trait;
use blocks::BlockGraph;
use thiserror::Error;

pub use managed::ManagedOcrClient;
pub use render::{PdfRenderer, TextImageRenderer};

/// Documents over this size are rejected from synchronous OCR (spec
/// §4.4: "Documents > 5 MB are rejected from synchronous OCR").
pub const SYNC_OCR_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("document exceeds synchronous OCR size limit ({0} bytes)")]
    TooLarge(usize),
    #[error("unsupported document type")]
    UnsupportedDocumentType,
    #[error("provider error: {0}")]
    Provider(String),
}

/// Filename heuristic choosing the form-aware API variant over plain
/// text detection (spec §4.4: "form|invoice|receipt|tax|w2|1099 ->
/// form-aware API").
pub fn wants_form_aware_api(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ["form", "invoice", "receipt", "tax", "w2", "1099"]
        .iter()
        .any(|kw| lower.contains(kw))
}

#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Run OCR over a whole document's bytes, returning page-ordered
    /// reconstructed text (spec §4.4 "Managed OCR on the entire
    /// document").
    async fn detect_document(&self, bytes: &[u8], filename: &str) -> Result<String, OcrError>;

    /// Run OCR over one rendered page image, for the render-and-OCR and
    /// text-image-synthesis fallbacks (spec §4.4 steps 4-5).
    async fn detect_page_image(&self, png_bytes: &[u8]) -> Result<String, OcrError>;
}

/// Assemble the final document text from multiple per-page OCR results,
/// separating pages with "--- Page k ---" markers (spec §4.4).
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("--- Page {} ---\n{}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Reconstruct text for one page from a raw block list using
/// [`BlockGraph`].
pub fn reconstruct_from_blocks(blocks: Vec<blocks::Block>) -> String {
    BlockGraph::new(blocks).reconstruct_page_text()
}
