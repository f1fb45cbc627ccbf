//! Content-Text Extractor dispatcher (spec §4.4): routes a `ContentType`
//! plus raw bytes to the matching tier and returns an [`ExtractedText`].

pub mod html;
pub mod office;
pub mod pdf;
pub mod plain;

use crate::error::ExtractedText;
use crate::ocr::render::PdfRenderer;
use crate::ocr::OcrProvider;
use archivist_types::ContentType;

/// Dispatch one artifact's bytes through the matching extraction tier
/// (spec §4.4 table). PDFs are the only content type that needs the OCR
/// providers; everything else is pure, synchronous, native parsing.
pub async fn extract(
    content_type: ContentType,
    bytes: &[u8],
    filename: &str,
    ocr: &dyn OcrProvider,
    renderer: &dyn PdfRenderer,
) -> ExtractedText {
    match content_type {
        ContentType::Html => {
            let text = html::extract(&plain::decode_lossy(bytes));
            ExtractedText::text(text)
        }
        ContentType::Text => ExtractedText::text(plain::decode_lossy(bytes)),
        ContentType::Csv => ExtractedText::text(plain::extract_csv(bytes)),
        ContentType::Json => ExtractedText::text(plain::extract_json(bytes)),
        ContentType::Xlsx => match office::extract_xlsx(bytes) {
            Ok(text) => ExtractedText::text(text),
            Err(reason) => ExtractedText::placeholder(format!(
                "File: {filename} (xlsx) — could not be read: {reason}"
            )),
        },
        ContentType::Pptx => match office::extract_pptx(bytes) {
            Ok(text) => ExtractedText::text(text),
            Err(reason) => ExtractedText::placeholder(format!(
                "File: {filename} (pptx) — could not be read: {reason}"
            )),
        },
        ContentType::Docx => match office::extract_docx(bytes) {
            Ok(text) => ExtractedText::text(text),
            Err(reason) => ExtractedText::placeholder(format!(
                "File: {filename} (docx) — could not be read: {reason}"
            )),
        },
        ContentType::Pdf => {
            let result = pdf::extract(bytes, filename, ocr, renderer).await;
            match result.page_count {
                Some(pages) => ExtractedText::with_pages(result.text, pages),
                None => ExtractedText::text(result.text),
            }
        }
        ContentType::Image => {
            ExtractedText::placeholder(format!("Image file: {filename}"))
        }
        ContentType::OtherBinary => ExtractedText::placeholder(format!(
            "File: {filename} ({}) — Binary content available",
            content_type.default_extension()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::render::{NoRenderer, RenderError};
    use crate::ocr::OcrError;
    use async_trait::async_trait;

    struct UnreachableOcr;

    #[async_trait]
    impl OcrProvider for UnreachableOcr {
        async fn detect_document(&self, _: &[u8], _: &str) -> Result<String, OcrError> {
            Err(OcrError::UnsupportedDocumentType)
        }
        async fn detect_page_image(&self, _: &[u8]) -> Result<String, OcrError> {
            Err(OcrError::UnsupportedDocumentType)
        }
    }

    #[allow(dead_code)]
    fn renderer_unavailable() -> Result<Vec<u8>, RenderError> {
        NoRenderer.rasterize_page(b"", 0, 200)
    }

    #[tokio::test]
    async fn html_dispatch_strips_tags() {
        let ocr = UnreachableOcr;
        let renderer = NoRenderer;
        let result = extract(
            ContentType::Html,
            b"<html><body><p>Hi</p></body></html>",
            "page.html",
            &ocr,
            &renderer,
        )
        .await;
        assert_eq!(result.text, "Hi");
        assert!(!result.is_binary);
    }

    #[tokio::test]
    async fn image_dispatch_is_a_placeholder() {
        let ocr = UnreachableOcr;
        let renderer = NoRenderer;
        let result = extract(ContentType::Image, b"\x89PNG", "photo.png", &ocr, &renderer).await;
        assert!(result.is_binary);
        assert!(result.text.contains("photo.png"));
    }
}
