//! Font resolution and character metrics for worksheet rendering.
//!
//! A render call resolves exactly one font: the bundled Unicode TrueType font
//! if its file can be read and parsed, otherwise the built-in Helvetica. The
//! fallback covers printable ASCII only; anything outside that repertoire is
//! unmeasurable and gets dropped by the layout and encoding layers.

use anyhow::{anyhow, Result};
use fontdue::{Font, FontSettings};
use log::{info, warn};
use std::path::Path;
use unicode_script::{Script, UnicodeScript};

/// Well-known file name of the bundled Unicode font (IPAexGothic).
pub const DEFAULT_FONT_FILE: &str = "ipaexg.ttf";

/// PDF BaseFont name used when the bundled font is embedded.
pub const EMBEDDED_BASE_FONT: &str = "IPAexGothic";

/// PDF BaseFont name of the guaranteed-present fallback.
pub const BUILTIN_BASE_FONT: &str = "Helvetica";

/// The font resolved for one render call.
pub enum ResolvedFont {
    /// Bundled TrueType font, parsed and kept as raw bytes for embedding.
    Embedded { font: Font, data: Vec<u8> },
    /// Built-in Helvetica with a static width table. Latin-only.
    Builtin,
}

impl ResolvedFont {
    /// Resolve the rendering font, falling back to Helvetica on any failure.
    /// Never fails; the degradation is recorded by [`ResolvedFont::is_fallback`].
    pub fn resolve(font_path: &Path) -> Self {
        match Self::load_embedded(font_path) {
            Ok(resolved) => {
                info!("loaded font {} from {}", EMBEDDED_BASE_FONT, font_path.display());
                resolved
            }
            Err(e) => {
                warn!("falling back to {}: {}", BUILTIN_BASE_FONT, e);
                ResolvedFont::Builtin
            }
        }
    }

    fn load_embedded(font_path: &Path) -> Result<Self> {
        if !font_path.exists() {
            return Err(anyhow!("font file {} not found", font_path.display()));
        }
        let data = std::fs::read(font_path)?;
        let font = Font::from_bytes(data.clone(), FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font {}: {}", font_path.display(), e))?;
        Ok(ResolvedFont::Embedded { font, data })
    }

    /// True when the Latin-only fallback font is in use.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedFont::Builtin)
    }

    pub fn base_font_name(&self) -> &'static str {
        match self {
            ResolvedFont::Embedded { .. } => EMBEDDED_BASE_FONT,
            ResolvedFont::Builtin => BUILTIN_BASE_FONT,
        }
    }

    /// Advance width of one character at the given size, in points.
    /// `None` means the character has no width under this font and must be
    /// skipped rather than drawn.
    pub fn char_width(&self, ch: char, size: f32) -> Option<f32> {
        match self {
            // fontdue maps missing glyphs to .notdef, which still measures.
            ResolvedFont::Embedded { font, .. } => Some(font.metrics(ch, size).advance_width),
            ResolvedFont::Builtin => helvetica_char_width(ch).map(|w| w * size / 1000.0),
        }
    }

    /// Total width of a string, skipping unmeasurable characters.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .filter_map(|ch| self.char_width(ch, size))
            .sum()
    }
}

/// Whether the text contains Japanese/CJK content that the fallback font
/// cannot represent.
pub fn has_non_latin(text: &str) -> bool {
    text.chars()
        .any(|ch| matches!(ch.script(), Script::Han | Script::Hiragana | Script::Katakana))
}

// Helvetica AFM advance widths in 1/1000 em for ASCII 0x20..=0x7E.
// Index = (char as usize) - 0x20.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [f32; 95] = [
    // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, 333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    // 0      1      2      3      4      5      6      7      8      9
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    // :      ;      <      =      >      ?      @
    278.0, 278.0, 584.0, 584.0, 584.0, 556.0, 1015.0,
    // A      B      C      D      E      F      G      H      I      J      K      L      M
    667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 500.0, 667.0, 556.0, 833.0,
    // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
    722.0, 778.0, 667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0,
    // [      \      ]      ^      _      `
    278.0, 278.0, 278.0, 469.0, 556.0, 333.0,
    // a      b      c      d      e      f      g      h      i      j      k      l      m
    556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, 556.0, 222.0, 222.0, 500.0, 222.0, 833.0,
    // n      o      p      q      r      s      t      u      v      w      x      y      z
    556.0, 556.0, 556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, 500.0, 500.0, 500.0,
    // {      |      }      ~
    334.0, 260.0, 334.0, 584.0,
];

fn helvetica_char_width(ch: char) -> Option<f32> {
    let code = ch as usize;
    if (0x20..=0x7E).contains(&code) {
        Some(HELVETICA_WIDTHS[code - 0x20])
    } else {
        None
    }
}
