//! Core library for extracting fields from Brazilian service invoices (NFS-e).
//!
//! This crate provides:
//! - PDF first-page loading into positioned glyphs
//! - Literal text search and region reads on a page
//! - Anchor-based extraction templates, one per municipal layout
//! - A consolidated report with fixed columns

pub mod error;
pub mod extraction;
pub mod geometry;
pub mod models;
pub mod page;
pub mod pdf;
pub mod report;

pub use error::{NotasError, PdfError, Result, TemplateError};
pub use extraction::{
    AnchorRule, BatchJob, Extractor, PostProcess, RegionOffset, Template, TemplateRegistry,
};
pub use geometry::Rect;
pub use models::columns::CANONICAL_COLUMNS;
pub use models::config::NotasConfig;
pub use models::record::{ExecutionStatus, ExtractionRecord};
pub use page::{Glyph, GlyphPage, TextPage};
pub use pdf::{DocumentSource, PdfSource};
pub use report::{assemble, assemble_with, ReportTable, Row, PLACEHOLDER};
