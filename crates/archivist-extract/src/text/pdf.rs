//! PDF extraction chain (spec §4.4). Stops on the first tier whose
//! concatenated text yields more than 10 non-whitespace characters:
//!
//! 1. native parser A (`lopdf`, fast, text-layer walk)
//! 2. native parser B (`pdf-extract`, layout-aware)
//! 3. managed OCR on the whole document
//! 4. render-and-OCR: rasterize each page, OCR each image
//! 5. text-image synthesis: if no renderer, draw the already-extracted
//!    page text into a synthetic image and OCR that
//!
//! Corruption is short-circuited before any tier runs.

use crate::ocr::render::{PdfRenderer, RenderError, TextImageRenderer};
use crate::ocr::{join_pages, OcrProvider};

const MIN_MEANINGFUL_CHARS: usize = 10;

fn non_whitespace_count(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

fn is_meaningful(s: &str) -> bool {
    non_whitespace_count(s) > MIN_MEANINGFUL_CHARS
}

/// Reject obviously broken PDFs before spending any parser tier on them
/// (spec §4.4 "Corruption detection").
pub fn detect_corruption(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 1024 {
        return Some("file too small to be a valid PDF");
    }
    if !bytes.starts_with(b"%PDF-") {
        return Some("missing %PDF- header");
    }
    let tail_start = bytes.len().saturating_sub(1024);
    if !bytes[tail_start..].windows(5).any(|w| w == b"%%EOF") {
        return Some("missing %%EOF trailer");
    }
    let nul_count = bytes.iter().filter(|&&b| b == 0).count();
    if nul_count * 2 > bytes.len() {
        return Some("more than half the bytes are null");
    }
    None
}

/// Native parser A: walk pages with `lopdf` and pull each page's text
/// operators. Fast but ignores layout.
fn native_parser_a(bytes: &[u8]) -> Option<(String, u32)> {
    let doc = lopdf::Document::load_mem(bytes).ok()?;
    let pages = doc.get_pages();
    let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
    page_numbers.sort_unstable();
    let page_texts: Vec<String> = page_numbers
        .iter()
        .map(|&n| doc.extract_text(&[n]).unwrap_or_default())
        .collect();
    let page_count = page_texts.len() as u32;
    Some((join_pages(&page_texts), page_count))
}

/// Native parser B: `pdf-extract`'s layout-aware extractor over the
/// whole document at once.
fn native_parser_b(bytes: &[u8]) -> Option<String> {
    pdf_extract::extract_text_from_mem(bytes).ok()
}

/// Result of running the whole chain.
pub struct PdfExtraction {
    pub text: String,
    pub page_count: Option<u32>,
}

/// Drives the tiered chain for one PDF. `ocr` performs managed-OCR calls;
/// `renderer` rasterizes pages for the render-and-OCR tier (spec step 4);
/// when it reports [`RenderError::Unavailable`] the chain falls back to
/// [`TextImageRenderer`] (spec step 5).
pub async fn extract(
    bytes: &[u8],
    filename: &str,
    ocr: &dyn OcrProvider,
    renderer: &dyn PdfRenderer,
) -> PdfExtraction {
    if detect_corruption(bytes).is_some() {
        return PdfExtraction {
            text: format!(
                "PDF content could not be extracted from {filename}. This PDF appears to be corrupted or damaged."
            ),
            page_count: None,
        };
    }

    if let Some((text, page_count)) = native_parser_a(bytes) {
        if is_meaningful(&text) {
            return PdfExtraction { text, page_count: Some(page_count) };
        }
    }

    if let Some(text) = native_parser_b(bytes) {
        if is_meaningful(&text) {
            return PdfExtraction { text, page_count: None };
        }
    }

    match ocr.detect_document(bytes, filename).await {
        Ok(text) if is_meaningful(&text) => {
            return PdfExtraction { text, page_count: None };
        }
        _ => {}
    }

    // Render-and-OCR, falling back to text-image synthesis of whatever
    // native text we did manage to pull (spec §4.4 steps 4-5).
    let (fallback_source_text, page_count_hint) = match native_parser_a(bytes) {
        Some((text, pages)) => (text, pages.max(1)),
        None => (String::new(), 1),
    };
    let mut page_results = Vec::new();

    for page_index in 0..page_count_hint {
        let png = match renderer.rasterize_page(bytes, page_index as usize, 200) {
            Ok(png) => png,
            Err(RenderError::Unavailable) => {
                let synth_source = fallback_source_text
                    .split("--- Page ")
                    .nth(page_index as usize + 1)
                    .unwrap_or(&fallback_source_text);
                match TextImageRenderer.synthesize(synth_source) {
                    Ok(png) => png,
                    Err(_) => {
                        page_results.push("[Processing failed]".to_string());
                        continue;
                    }
                }
            }
            Err(RenderError::Failed(_)) => {
                page_results.push("[Processing failed]".to_string());
                continue;
            }
        };

        match ocr.detect_page_image(&png).await {
            Ok(text) => page_results.push(text),
            Err(_) => page_results.push("[Processing failed]".to_string()),
        }
    }

    let joined = join_pages(&page_results);
    if is_meaningful(&joined) {
        return PdfExtraction { text: joined, page_count: Some(page_count_hint) };
    }

    PdfExtraction {
        text: format!(
            "File: {filename} (pdf) — no extractable text (likely image-based, encrypted, or corrupted)"
        ),
        page_count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrError;
    use async_trait::async_trait;

    struct NeverOcr;

    #[async_trait]
    impl OcrProvider for NeverOcr {
        async fn detect_document(&self, _: &[u8], _: &str) -> Result<String, OcrError> {
            Err(OcrError::UnsupportedDocumentType)
        }
        async fn detect_page_image(&self, _: &[u8]) -> Result<String, OcrError> {
            Ok("[Processing failed]".to_string())
        }
    }

    struct AlwaysUnavailableRenderer;

    impl PdfRenderer for AlwaysUnavailableRenderer {
        fn rasterize_page(&self, _: &[u8], _: usize, _: u32) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Unavailable)
        }
    }

    #[test]
    fn corrupt_small_file_is_rejected() {
        assert!(detect_corruption(b"too small").is_some());
    }

    #[test]
    fn corrupt_missing_header_is_rejected() {
        let mut body = vec![b' '; 2000];
        body.extend_from_slice(b"%%EOF");
        assert!(detect_corruption(&body).is_some());
    }

    #[test]
    fn well_formed_header_and_trailer_pass_corruption_check() {
        let mut body = b"%PDF-1.4\n".to_vec();
        body.extend_from_slice(&vec![b'a'; 2000]);
        body.extend_from_slice(b"%%EOF");
        assert!(detect_corruption(&body).is_none());
    }

    #[tokio::test]
    async fn corrupted_bytes_short_circuit_before_any_tier() {
        let ocr = NeverOcr;
        let renderer = AlwaysUnavailableRenderer;
        let result = extract(b"not a pdf", "broken.pdf", &ocr, &renderer).await;
        assert!(result.text.contains("could not be extracted from broken.pdf"));
        assert!(result.text.contains("corrupted or damaged"));
        assert!(result.page_count.is_none());
    }
}
