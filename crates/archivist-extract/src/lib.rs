//! Link Extractor and tiered Content-Text Extractor (spec §4.2, §4.4).
//!
//! This crate has two independent halves that share only their error and
//! OCR-block-graph types: [`link_extractor`] classifies outbound URLs
//! found in already-fetched HTML, while [`text`] turns raw artifact bytes
//! into UTF-8 text across the native-parser / managed-OCR / rendered-
//! image-OCR tiers.

pub mod error;
pub mod link_extractor;
pub mod ocr;
pub mod text;

pub use error::{ExtractError, ExtractedText};
pub use link_extractor::{extract_links, ExtractedLinks};
pub use ocr::{OcrError, OcrProvider};
pub use text::extract as extract_text;
pub use text::html::extract_title;
