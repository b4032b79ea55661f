//! Page-level text primitives: literal search and region reads.

mod layout;

pub use layout::{GlyphPage, PageBuilder, TextLine};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A single positioned character (or ligature) on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Decoded text of the glyph.
    pub text: String,
    /// Glyph box in page space.
    pub rect: Rect,
}

impl Glyph {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
        }
    }

    /// True for glyphs that carry only whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Read-only access to the text of one page.
///
/// This is the only view of a document the extraction engine needs.
pub trait TextPage {
    /// Page area, origin at the top-left corner.
    fn bounds(&self) -> Rect;

    /// Every occurrence of `needle` in reading order.
    ///
    /// With a `clip`, only occurrences lying inside the clip are reported.
    /// No occurrence yields an empty vector.
    fn search(&self, needle: &str, clip: Option<&Rect>) -> Vec<Rect>;

    /// Text touching `region`, one line per text line, joined with `'\n'`.
    ///
    /// Returns an empty string when the region holds no text.
    fn read_text(&self, region: &Rect) -> String;
}
