//! Anchor rules: locate a label, derive a region, read the value.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::postprocess::{apply_all, PostProcess};
use crate::geometry::Rect;
use crate::page::TextPage;

/// Reference line a coordinate is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Anchor's left edge (x0).
    Left,
    /// Anchor's right edge (x1).
    Right,
    /// Anchor's top edge (y0).
    Top,
    /// Anchor's bottom edge (y1).
    Bottom,
    PageLeft,
    PageRight,
    PageTop,
    PageBottom,
}

impl Edge {
    fn resolve(self, anchor: &Rect, page: &Rect) -> f32 {
        match self {
            Edge::Left => anchor.x0,
            Edge::Right => anchor.x1,
            Edge::Top => anchor.y0,
            Edge::Bottom => anchor.y1,
            Edge::PageLeft => page.x0,
            Edge::PageRight => page.x1,
            Edge::PageTop => page.y0,
            Edge::PageBottom => page.y1,
        }
    }
}

/// A coordinate expressed as an edge plus a delta in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub from: Edge,
    #[serde(default)]
    pub offset: f32,
}

impl Coord {
    pub const fn new(from: Edge, offset: f32) -> Self {
        Self { from, offset }
    }

    pub const fn left(offset: f32) -> Self {
        Self::new(Edge::Left, offset)
    }

    pub const fn right(offset: f32) -> Self {
        Self::new(Edge::Right, offset)
    }

    pub const fn top(offset: f32) -> Self {
        Self::new(Edge::Top, offset)
    }

    pub const fn bottom(offset: f32) -> Self {
        Self::new(Edge::Bottom, offset)
    }

    pub const fn page_right(offset: f32) -> Self {
        Self::new(Edge::PageRight, offset)
    }

    fn resolve(&self, anchor: &Rect, page: &Rect) -> f32 {
        self.from.resolve(anchor, page) + self.offset
    }
}

/// Derives a rectangle from an anchor rectangle, one coordinate per corner edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOffset {
    pub x0: Coord,
    pub y0: Coord,
    pub x1: Coord,
    pub y1: Coord,
}

impl RegionOffset {
    pub const fn new(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Region for a concrete anchor. Inverted results collapse to empty.
    pub fn apply(&self, anchor: &Rect, page: &Rect) -> Rect {
        Rect::new(
            self.x0.resolve(anchor, page),
            self.y0.resolve(anchor, page),
            self.x1.resolve(anchor, page),
            self.y1.resolve(anchor, page),
        )
    }
}

/// A second label searched for near the primary anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAnchor {
    /// Literal text to find.
    pub text: String,
    /// Search area, derived from the primary anchor.
    pub search: RegionOffset,
}

/// How one output field is read from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRule {
    /// Output column key.
    pub field: String,
    /// Literal label searched on the whole page.
    pub anchor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryAnchor>,
    /// Capture region, derived from the effective anchor.
    pub capture: RegionOffset,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_process: Vec<PostProcess>,
    /// Missing values are reported louder, never fatal.
    #[serde(default)]
    pub required: bool,
}

/// Every intermediate step of one rule evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleTrace {
    pub field: String,
    pub anchor: Option<Rect>,
    pub search_region: Option<Rect>,
    pub secondary: Option<Rect>,
    pub capture: Option<Rect>,
    pub raw_text: Option<String>,
    pub value: Option<String>,
}

impl AnchorRule {
    pub fn new(field: impl Into<String>, anchor: impl Into<String>, capture: RegionOffset) -> Self {
        Self {
            field: field.into(),
            anchor: anchor.into(),
            secondary: None,
            capture,
            post_process: Vec::new(),
            required: false,
        }
    }

    /// Locate `text` inside `search` before capturing.
    pub fn with_secondary(mut self, text: impl Into<String>, search: RegionOffset) -> Self {
        self.secondary = Some(SecondaryAnchor {
            text: text.into(),
            search,
        });
        self
    }

    pub fn with_post(mut self, step: PostProcess) -> Self {
        self.post_process.push(step);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Field value, or `None` when any anchor is missing or nothing is captured.
    pub fn evaluate<P: TextPage + ?Sized>(&self, page: &P) -> Option<String> {
        self.trace(page).value
    }

    /// Evaluate and keep every intermediate rectangle.
    pub fn trace<P: TextPage + ?Sized>(&self, page: &P) -> RuleTrace {
        let mut trace = RuleTrace {
            field: self.field.clone(),
            ..Default::default()
        };
        let bounds = page.bounds();

        // Only the first occurrence counts.
        let Some(anchor) = page.search(&self.anchor, None).into_iter().next() else {
            trace!("{}: anchor '{}' not found", self.field, self.anchor);
            return trace;
        };
        trace.anchor = Some(anchor);

        let effective = match &self.secondary {
            Some(secondary) => {
                let region = secondary.search.apply(&anchor, &bounds);
                trace.search_region = Some(region);

                let Some(found) = page.search(&secondary.text, Some(&region)).into_iter().next()
                else {
                    trace!(
                        "{}: secondary anchor '{}' not found in {}",
                        self.field,
                        secondary.text,
                        region
                    );
                    return trace;
                };
                trace.secondary = Some(found);
                found
            }
            None => anchor,
        };

        let capture = self.capture.apply(&effective, &bounds);
        trace.capture = Some(capture);

        let raw = page.read_text(&capture);
        trace.value = apply_all(&self.post_process, &raw);
        trace.raw_text = Some(raw);

        trace!("{}: {:?}", self.field, trace.value);
        trace
    }
}
