//! Positioned text extraction using lopdf and pdf-extract.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::{DocumentSource, Result};
use crate::error::PdfError;
use crate::geometry::Rect;
use crate::models::config::PageConfig;
use crate::page::{Glyph, GlyphPage};

/// Share of the em box above the baseline.
const ASCENT: f32 = 0.8;
/// Share of the em box below the baseline.
const DESCENT: f32 = 0.2;

/// Opens PDF files from disk and reads their first page.
#[derive(Debug, Clone, Default)]
pub struct PdfSource {
    config: PageConfig,
}

impl PdfSource {
    /// Create a source with the given line grouping settings.
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Load page 1 of an in-memory PDF.
    pub fn load_first_page(&self, data: &[u8]) -> Result<GlyphPage> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let first = doc
            .get_pages()
            .keys()
            .next()
            .copied()
            .ok_or(PdfError::NoPages)?;

        let mut collector = GlyphCollector::new(first);
        // Only page 1 is walked, so broken later pages cannot fail the document.
        // pdf-extract panics on some malformed content streams; keep that
        // contained to this document.
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::output_doc_page(&doc, &mut collector, first)
        }))
        .map_err(|_| PdfError::TextExtraction("content stream could not be walked".to_string()))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let (bounds, glyphs) = collector.finish()?;
        debug!(
            "Collected {} glyphs from page {} ({} x {} pt)",
            glyphs.len(),
            first,
            bounds.width(),
            bounds.height()
        );

        Ok(GlyphPage::from_glyphs(bounds, glyphs, &self.config))
    }
}

impl DocumentSource for PdfSource {
    type Page = GlyphPage;

    fn open_first_page(&self, path: &Path) -> Result<GlyphPage> {
        let data = fs::read(path).map_err(|source| PdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_first_page(&data)
    }
}

/// `OutputDev` that records every character of one page with its box.
pub struct GlyphCollector {
    page: u32,
    active: bool,
    /// Media box corner used to move the origin to the top-left.
    origin: (f64, f64),
    bounds: Option<Rect>,
    glyphs: Vec<Glyph>,
}

impl GlyphCollector {
    /// Collect glyphs of page `page` (1-indexed) only.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            active: false,
            origin: (0.0, 0.0),
            bounds: None,
            glyphs: Vec::new(),
        }
    }

    /// Page bounds and glyphs collected so far.
    pub fn finish(self) -> Result<(Rect, Vec<Glyph>)> {
        let bounds = self.bounds.ok_or_else(|| {
            PdfError::TextExtraction(format!("page {} was never rendered", self.page))
        })?;
        Ok((bounds, self.glyphs))
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.active = page_num == self.page;
        if self.active {
            self.origin = (media_box.llx, media_box.ury);
            self.bounds = Some(Rect::new(
                0.0,
                0.0,
                (media_box.urx - media_box.llx) as f32,
                (media_box.ury - media_box.lly) as f32,
            ));
        }
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.active = false;
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        if !self.active || char.is_empty() {
            return Ok(());
        }

        // Scale of the text rendering matrix along each axis.
        let sx = trm.m11.hypot(trm.m12);
        let sy = trm.m21.hypot(trm.m22);

        let em_height = (font_size * sy) as f32;
        let mut advance = (width * font_size * sx) as f32;
        if advance <= 0.0 {
            advance = em_height * 0.5;
        }

        let x = (trm.m31 - self.origin.0) as f32;
        let baseline = (self.origin.1 - trm.m32) as f32;
        let rect = Rect::new(
            x,
            baseline - em_height * ASCENT,
            x + advance,
            baseline + em_height * DESCENT,
        );

        trace!("glyph {:?} at {}", char, rect);
        self.glyphs.push(Glyph::new(char, rect));
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}
