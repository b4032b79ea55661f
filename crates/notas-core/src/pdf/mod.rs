//! PDF processing module.

mod extractor;

pub use extractor::{GlyphCollector, PdfSource};

use std::path::Path;

use crate::error::PdfError;
use crate::page::TextPage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Opens documents and hands out their first page.
///
/// The document handle lives only inside `open_first_page`; the returned
/// page owns its text and holds no file or parser state.
pub trait DocumentSource {
    /// Page type produced by this source.
    type Page: TextPage;

    /// Open the document at `path` and load page 1.
    fn open_first_page(&self, path: &Path) -> Result<Self::Page>;
}
