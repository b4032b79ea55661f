//! In-memory page built from positioned glyphs.

use tracing::trace;

use super::{Glyph, TextPage};
use crate::geometry::Rect;
use crate::models::config::PageConfig;

/// One line of text in reading order.
#[derive(Debug, Clone)]
pub struct TextLine {
    glyphs: Vec<Glyph>,
    text: String,
    /// Byte offset of each glyph inside `text`.
    offsets: Vec<usize>,
}

impl TextLine {
    fn new(glyphs: Vec<Glyph>) -> Self {
        let mut text = String::new();
        let mut offsets = Vec::with_capacity(glyphs.len());
        for glyph in &glyphs {
            offsets.push(text.len());
            text.push_str(&glyph.text);
        }
        Self {
            glyphs,
            text,
            offsets,
        }
    }

    /// Full text of the line.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Index range of glyphs covering the byte range `start..end`.
    fn glyph_span(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.offsets.partition_point(|&o| o <= start).saturating_sub(1);
        let last = self.offsets.partition_point(|&o| o < end).saturating_sub(1);
        (first, last.max(first))
    }

    fn search(&self, needle: &str, clip: Option<&Rect>, hits: &mut Vec<Rect>) {
        for (start, matched) in self.text.match_indices(needle) {
            let (first, last) = self.glyph_span(start, start + matched.len());
            let span = &self.glyphs[first..=last];

            if let Some(clip) = clip {
                let inside = span
                    .iter()
                    .filter(|g| !g.is_whitespace())
                    .all(|g| g.rect.intersects(clip));
                if !inside {
                    continue;
                }
            }

            let rect = span
                .iter()
                .skip(1)
                .fold(span[0].rect, |acc, g| acc.union(&g.rect));
            hits.push(rect);
        }
    }

    fn read(&self, region: &Rect) -> String {
        let mut fragment = String::new();
        let mut pending_space = false;

        for glyph in &self.glyphs {
            if glyph.is_whitespace() {
                pending_space = !fragment.is_empty();
                continue;
            }
            if !glyph.rect.intersects(region) {
                continue;
            }
            if pending_space {
                fragment.push(' ');
                pending_space = false;
            }
            fragment.push_str(&glyph.text);
        }

        fragment.trim().to_string()
    }
}

/// A page of positioned glyphs grouped into lines.
#[derive(Debug, Clone)]
pub struct GlyphPage {
    bounds: Rect,
    lines: Vec<TextLine>,
}

impl GlyphPage {
    /// Group glyphs into lines and order them for reading.
    pub fn from_glyphs(bounds: Rect, mut glyphs: Vec<Glyph>, config: &PageConfig) -> Self {
        glyphs.retain(|g| !g.text.is_empty());
        glyphs.sort_by(|a, b| {
            let (ax, ay) = a.rect.center();
            let (bx, by) = b.rect.center();
            ay.total_cmp(&by).then(ax.total_cmp(&bx))
        });

        let mut rows: Vec<(f32, Vec<Glyph>)> = Vec::new();
        for glyph in glyphs {
            let (_, cy) = glyph.rect.center();
            match rows.last_mut() {
                Some((line_y, row)) if (cy - *line_y).abs() <= config.line_tolerance => {
                    row.push(glyph);
                }
                _ => rows.push((cy, vec![glyph])),
            }
        }

        let mut lines: Vec<TextLine> = rows
            .into_iter()
            .map(|(_, mut row)| {
                row.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
                TextLine::new(insert_gap_spaces(row, config.space_gap_ratio))
            })
            .collect();

        lines.sort_by(|a, b| line_top(a).total_cmp(&line_top(b)));

        trace!("Built page with {} lines", lines.len());
        Self { bounds, lines }
    }

    /// Start a synthetic page of the given size.
    pub fn builder(width: f32, height: f32) -> PageBuilder {
        PageBuilder::new(width, height)
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// All text of the page, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextPage for GlyphPage {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn search(&self, needle: &str, clip: Option<&Rect>) -> Vec<Rect> {
        let mut hits = Vec::new();
        if needle.is_empty() {
            return hits;
        }
        for line in &self.lines {
            line.search(needle, clip, &mut hits);
        }
        hits
    }

    fn read_text(&self, region: &Rect) -> String {
        if region.is_empty() {
            return String::new();
        }
        self.lines
            .iter()
            .map(|line| line.read(region))
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn line_top(line: &TextLine) -> f32 {
    line.glyphs
        .iter()
        .map(|g| g.rect.y0)
        .fold(f32::INFINITY, f32::min)
}

/// Insert a space glyph wherever two visible glyphs sit visibly apart.
fn insert_gap_spaces(row: Vec<Glyph>, gap_ratio: f32) -> Vec<Glyph> {
    let mut out: Vec<Glyph> = Vec::with_capacity(row.len());
    for glyph in row {
        if let Some(prev) = out.last() {
            let gap = glyph.rect.x0 - prev.rect.x1;
            let height = prev.rect.height().max(glyph.rect.height());
            if !prev.is_whitespace() && !glyph.is_whitespace() && gap > height * gap_ratio {
                let space = Rect::new(
                    prev.rect.x1,
                    prev.rect.y0.min(glyph.rect.y0),
                    glyph.rect.x0,
                    prev.rect.y1.max(glyph.rect.y1),
                );
                out.push(Glyph::new(" ", space));
            }
        }
        out.push(glyph);
    }
    out
}

/// Builder for synthetic pages with evenly spaced glyphs.
///
/// Every character is `0.5 × font_size` wide and `font_size` tall, with its
/// top edge at the given `y`.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    bounds: Rect,
    glyphs: Vec<Glyph>,
    config: PageConfig,
}

impl PageBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            glyphs: Vec::new(),
            config: PageConfig::default(),
        }
    }

    /// Place `text` with its top-left corner at `(x, y)`.
    pub fn text(mut self, x: f32, y: f32, font_size: f32, text: &str) -> Self {
        let advance = font_size * 0.5;
        for (i, ch) in text.chars().enumerate() {
            let x0 = x + advance * i as f32;
            self.glyphs.push(Glyph::new(
                ch.to_string(),
                Rect::from_origin_size(x0, y, advance, font_size),
            ));
        }
        self
    }

    /// Place a single glyph.
    pub fn glyph(mut self, glyph: Glyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> GlyphPage {
        GlyphPage::from_glyphs(self.bounds, self.glyphs, &self.config)
    }
}
