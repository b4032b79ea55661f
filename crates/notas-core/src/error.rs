//! Error types for the notas-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the notas library.
#[derive(Error, Debug)]
pub enum NotasError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Template definition or loading error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No template is registered for a layout key.
    #[error("no template registered for layout '{0}'")]
    UnsupportedLayout(String),

    /// Report writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while opening a document and reading its first page.
///
/// Any of these ends up as `open_error: <detail>` on the document's record.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file could not be read from disk.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the PDF structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to walk the page content for positioned text.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Errors in template definitions.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Two rules in one template write the same field.
    #[error("layout '{layout}' defines field '{field}' more than once")]
    DuplicateField { layout: String, field: String },

    /// A static field shares its name with a rule field.
    #[error("layout '{layout}' uses '{field}' both as a rule and a static field")]
    FieldCollision { layout: String, field: String },

    /// A `capture` post-process carries an invalid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A template file could not be read or parsed.
    #[error("failed to load template from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Result type for the notas library.
pub type Result<T> = std::result::Result<T, NotasError>;
