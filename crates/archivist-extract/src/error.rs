use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ParseError
    }
}

/// Result of running the Content-Text Extractor over one artifact (spec
/// §4.4). Extraction never hard-fails for the caller: when every tier in
/// a chain is exhausted, `text` becomes a descriptive placeholder and
/// `is_binary` is set, per spec §7 "Parse error" handling.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: Option<u32>,
    pub is_binary: bool,
}

impl ExtractedText {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_count: None,
            is_binary: false,
        }
    }

    pub fn with_pages(text: impl Into<String>, page_count: u32) -> Self {
        Self {
            text: text.into(),
            page_count: Some(page_count),
            is_binary: false,
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_count: None,
            is_binary: true,
        }
    }
}
