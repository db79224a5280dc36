//! Text pagination and wrapping.
//!
//! Lays free-form multi-line text out onto fixed-size A4 pages. The canonical
//! policy wraps at character granularity against the maximum drawable width;
//! line-level placement survives as a degraded mode that allows horizontal
//! overflow. Both modes share the same page-break rule: a visual line whose
//! cursor has passed the bottom margin opens a new page first.

use crate::fonts::ResolvedFont;
use log::debug;
use serde::{Deserialize, Serialize};

/// Frozen A4 page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Left and right margin.
    pub margin_x: f32,
    pub margin_bottom: f32,
    /// Cursor start position, reset here after each page break.
    pub top_y: f32,
    pub line_height: f32,
    pub font_size: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin_x: 50.0,
            margin_bottom: 50.0,
            top_y: 800.0,
            line_height: 15.0,
            font_size: 11.0,
        }
    }
}

impl PageGeometry {
    /// Maximum drawable width between the side margins.
    pub fn max_text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }
}

/// One positioned text fragment. Coordinates are PDF points with the origin
/// at the bottom-left of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// One fully laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number in emission order.
    pub number: usize,
    pub lines: Vec<PlacedText>,
}

/// Wrapping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// Wrap at character granularity against `max_text_width` (canonical).
    CharLevel,
    /// Place each input line verbatim; long lines overflow horizontally.
    LineLevel,
}

/// Tracks the drawing cursor and accumulates finished pages.
struct PageCursor<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<Page>,
    current: Vec<PlacedText>,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Vec::new(),
            y: geometry.top_y,
        }
    }

    fn break_page_if_needed(&mut self) {
        if self.y < self.geometry.margin_bottom {
            let number = self.pages.len() + 1;
            self.pages.push(Page {
                number,
                lines: std::mem::take(&mut self.current),
            });
            self.y = self.geometry.top_y;
        }
    }

    /// Place one visual line at the cursor and advance. Empty text consumes
    /// the line height without emitting a fragment.
    fn place(&mut self, text: String) {
        self.break_page_if_needed();
        if !text.is_empty() {
            self.current.push(PlacedText {
                x: self.geometry.margin_x,
                y: self.y,
                text,
            });
        }
        self.y -= self.geometry.line_height;
    }

    fn finish(mut self) -> Vec<Page> {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            lines: self.current,
        });
        self.pages
    }
}

/// Lay out `text` onto A4 pages. Infallible: every input, including the empty
/// string, produces at least one (possibly empty) page.
pub fn paginate(
    text: &str,
    font: &ResolvedFont,
    geometry: &PageGeometry,
    mode: WrapMode,
) -> Vec<Page> {
    let mut cursor = PageCursor::new(geometry);
    let max_width = geometry.max_text_width();

    for line in text.split('\n') {
        match mode {
            WrapMode::LineLevel => cursor.place(line.to_string()),
            WrapMode::CharLevel => wrap_line(line, font, geometry, max_width, &mut cursor),
        }
    }

    cursor.finish()
}

fn wrap_line(
    line: &str,
    font: &ResolvedFont,
    geometry: &PageGeometry,
    max_width: f32,
    cursor: &mut PageCursor<'_>,
) {
    if line.is_empty() {
        cursor.place(String::new());
        return;
    }

    let mut fragment = String::new();
    let mut fragment_width = 0.0_f32;
    let mut placed_any = false;

    for ch in line.chars() {
        let Some(char_width) = font.char_width(ch, geometry.font_size) else {
            debug!("skipping unmeasurable glyph {:?}", ch);
            continue;
        };
        // Flush before the append that would exceed the drawable width. An
        // oversized character on an empty fragment is placed alone so the
        // loop always makes forward progress.
        if fragment_width + char_width > max_width && !fragment.is_empty() {
            cursor.place(std::mem::take(&mut fragment));
            placed_any = true;
            fragment_width = 0.0;
        }
        fragment.push(ch);
        fragment_width += char_width;
    }

    if !fragment.is_empty() {
        cursor.place(fragment);
    } else if !placed_any {
        // The line had content but nothing drawable; it still occupies a row.
        cursor.place(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Under the default geometry the cursor visits 800, 785, ... 50: 51 rows.
    const LINES_PER_PAGE: usize = 51;

    fn geometry() -> PageGeometry {
        PageGeometry::default()
    }

    fn fragments(pages: &[Page]) -> Vec<&str> {
        pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.as_str()))
            .collect()
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let pages = paginate("", &ResolvedFont::Builtin, &geometry(), WrapMode::CharLevel);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn short_lines_fill_pages_in_order() {
        let k = LINES_PER_PAGE * 2 + 1;
        let text = vec!["ok"; k].join("\n");
        let pages = paginate(&text, &ResolvedFont::Builtin, &geometry(), WrapMode::LineLevel);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), LINES_PER_PAGE);
        assert_eq!(pages[1].lines.len(), LINES_PER_PAGE);
        assert_eq!(pages[2].lines.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[2].number, 3);
    }

    #[test]
    fn exact_page_fill_adds_no_trailing_page() {
        let text = vec!["ok"; LINES_PER_PAGE].join("\n");
        let pages = paginate(&text, &ResolvedFont::Builtin, &geometry(), WrapMode::LineLevel);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), LINES_PER_PAGE);
    }

    #[test]
    fn placed_y_stays_within_margins() {
        let text = vec!["line"; 200].join("\n");
        let geo = geometry();
        let pages = paginate(&text, &ResolvedFont::Builtin, &geo, WrapMode::LineLevel);
        for page in &pages {
            for line in &page.lines {
                assert!(line.y >= geo.margin_bottom);
                assert!(line.y <= geo.top_y);
            }
        }
    }

    #[test]
    fn blank_line_consumes_height_without_fragment() {
        let geo = geometry();
        let pages = paginate("first\n\nsecond", &ResolvedFont::Builtin, &geo, WrapMode::CharLevel);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 2);
        assert_eq!(pages[0].lines[0].text, "first");
        assert_eq!(pages[0].lines[1].text, "second");
        let gap = pages[0].lines[0].y - pages[0].lines[1].y;
        assert!((gap - 2.0 * geo.line_height).abs() < 1e-3);
    }

    #[test]
    fn char_wrap_splits_long_line() {
        let geo = geometry();
        // 'W' at 944/1000 em and 11pt is ~10.4pt; 60 of them exceed 495.28pt.
        let long = "W".repeat(60);
        let pages = paginate(&long, &ResolvedFont::Builtin, &geo, WrapMode::CharLevel);
        let frags = fragments(&pages);
        assert!(frags.len() > 1);
        let font = ResolvedFont::Builtin;
        for frag in &frags {
            assert!(font.text_width(frag, geo.font_size) <= geo.max_text_width() + 1e-3);
        }
        assert_eq!(frags.concat(), long);
    }

    #[test]
    fn line_level_keeps_long_line_verbatim() {
        let long = "W".repeat(200);
        let pages = paginate(&long, &ResolvedFont::Builtin, &geometry(), WrapMode::LineLevel);
        let frags = fragments(&pages);
        assert_eq!(frags, vec![long.as_str()]);
    }

    #[test]
    fn unmeasurable_glyphs_are_dropped_under_fallback() {
        let pages = paginate("aあb", &ResolvedFont::Builtin, &geometry(), WrapMode::CharLevel);
        let frags = fragments(&pages);
        assert_eq!(frags, vec!["ab"]);
    }

    #[test]
    fn fully_unmeasurable_line_still_occupies_a_row() {
        let geo = geometry();
        let pages = paginate("前\nafter", &ResolvedFont::Builtin, &geo, WrapMode::CharLevel);
        assert_eq!(pages[0].lines.len(), 1);
        assert_eq!(pages[0].lines[0].text, "after");
        // The undrawable first line consumed a row.
        assert!((pages[0].lines[0].y - (geo.top_y - geo.line_height)).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn char_wrap_fits_width_and_reconstructs(line in "[ -~]{0,200}") {
            let geo = geometry();
            let font = ResolvedFont::Builtin;
            let pages = paginate(&line, &font, &geo, WrapMode::CharLevel);
            let frags: Vec<String> = pages
                .iter()
                .flat_map(|p| p.lines.iter().map(|l| l.text.clone()))
                .collect();
            for frag in &frags {
                prop_assert!(font.text_width(frag, geo.font_size) <= geo.max_text_width() + 1e-3);
            }
            prop_assert_eq!(frags.concat(), line);
        }
    }
}
