//! Renshuu Worksheet PDF Creator
//!
//! Renders free-form worksheet text into fixed-size A4 PDF pages with
//! character-level wrapping, using the bundled IPAexGothic font when its file
//! is present and falling back to built-in Helvetica otherwise.

pub mod fonts;
pub mod layout;
pub mod pdf;

// Re-export commonly used functions and types
pub use fonts::{ResolvedFont, BUILTIN_BASE_FONT, DEFAULT_FONT_FILE, EMBEDDED_BASE_FONT};
pub use layout::{paginate, Page, PageGeometry, PlacedText, WrapMode};
pub use pdf::encode_pdf;

use anyhow::Result;
use log::warn;
use std::path::PathBuf;

/// Options for one render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Path of the Unicode font file to try before falling back.
    pub font_path: PathBuf,
    pub geometry: PageGeometry,
    pub wrap_mode: WrapMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_FILE),
            geometry: PageGeometry::default(),
            wrap_mode: WrapMode::CharLevel,
        }
    }
}

/// A fully materialized rendered document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// True when the Latin-only fallback font was used; non-Latin text in the
    /// output is visually corrupted in that case.
    pub degraded_font: bool,
}

/// Resolve the font, paginate the text, and encode the pages in one call.
pub fn create_worksheet_pdf(text: &str, options: &RenderOptions) -> Result<RenderedPdf> {
    let font = ResolvedFont::resolve(&options.font_path);
    if font.is_fallback() && fonts::has_non_latin(text) {
        warn!(
            "rendering non-Latin text with {}; output will be visually corrupted",
            BUILTIN_BASE_FONT
        );
    }

    let pages = paginate(text, &font, &options.geometry, options.wrap_mode);
    let page_count = pages.len();
    let bytes = encode_pdf(&pages, &font, &options.geometry)?;

    Ok(RenderedPdf {
        bytes,
        page_count,
        degraded_font: font.is_fallback(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_options() -> RenderOptions {
        RenderOptions {
            font_path: PathBuf::from("definitely-missing.ttf"),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn renders_plain_text_with_fallback() {
        let rendered = create_worksheet_pdf("Hello\nWorld", &fallback_options()).unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-"));
        assert_eq!(rendered.page_count, 1);
        assert!(rendered.degraded_font);
    }

    #[test]
    fn empty_text_renders_one_page() {
        let rendered = create_worksheet_pdf("", &fallback_options()).unwrap();
        assert_eq!(rendered.page_count, 1);
        assert!(rendered.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn long_text_spans_pages() {
        let text = vec!["Question line"; 120].join("\n");
        let rendered = create_worksheet_pdf(&text, &fallback_options()).unwrap();
        assert_eq!(rendered.page_count, 3);
    }
}
