use serde::{Deserialize, Serialize};

/// Content-type classification used by the Content-Text Extractor (spec
/// §4.4) and persisted on `CrawledDocument`. A tagged enum instead of a
/// free-form MIME string, per spec §9's "dynamic duck-typed JSON" redesign
/// flag for `ContentType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Csv,
    Json,
    Image,
    Text,
    /// Any artifact that native parsers don't understand and that isn't an
    /// image (spec §4.4 "other binary" row). Covers formats such as `.rtf`
    /// and `.msg` that the original Python pipeline routed to the same
    /// generic placeholder instead of failing outright.
    OtherBinary,
}

impl ContentType {
    /// True for types stored as base64 blobs with placeholder text rather
    /// than natively-extracted text (spec §3 CrawledDocument `is_binary`).
    pub fn is_binary(self) -> bool {
        matches!(self, ContentType::Image | ContentType::OtherBinary)
    }

    /// Classify from a lowercased file extension (no leading dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => ContentType::Html,
            "pdf" => ContentType::Pdf,
            "doc" | "docx" => ContentType::Docx,
            "xls" | "xlsx" => ContentType::Xlsx,
            "ppt" | "pptx" => ContentType::Pptx,
            "csv" => ContentType::Csv,
            "json" => ContentType::Json,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tiff" => ContentType::Image,
            "txt" | "md" | "text" => ContentType::Text,
            _ => ContentType::OtherBinary,
        }
    }

    pub fn default_extension(self) -> &'static str {
        match self {
            ContentType::Html => "html",
            ContentType::Pdf => "pdf",
            ContentType::Docx => "docx",
            ContentType::Xlsx => "xlsx",
            ContentType::Pptx => "pptx",
            ContentType::Csv => "csv",
            ContentType::Json => "json",
            ContentType::Image => "bin",
            ContentType::Text => "txt",
            ContentType::OtherBinary => "bin",
        }
    }

    /// Candidate extensions probed by the Object Store Adapter retrieval
    /// path when the metadata sidecar is missing (spec §4.5).
    pub fn probe_order() -> &'static [&'static str] {
        &["html", "pdf", "docx", "xlsx", "pptx", "csv", "json", "txt"]
    }
}
