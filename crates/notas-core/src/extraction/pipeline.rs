//! Document-level extraction: open, dispatch, evaluate, record.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::registry::TemplateRegistry;
use super::rule::RuleTrace;
use crate::error::{NotasError, Result};
use crate::models::record::ExtractionRecord;
use crate::page::TextPage;
use crate::pdf::{DocumentSource, PdfSource};

/// One document of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub path: PathBuf,
    /// Caller-side grouping, e.g. the municipality folder.
    pub group: String,
    pub layout_key: String,
}

/// Applies registered templates to documents.
///
/// Holds no per-document state, so one extractor can serve many threads.
pub struct Extractor<S: DocumentSource = PdfSource> {
    registry: Arc<TemplateRegistry>,
    source: S,
}

impl<S: DocumentSource> Extractor<S> {
    pub fn new(registry: Arc<TemplateRegistry>, source: S) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Extract one document. Never fails: every problem ends up in the status.
    pub fn extract(&self, path: &Path, layout_key: &str) -> ExtractionRecord {
        let start = Instant::now();

        let page = match self.source.open_first_page(path) {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not open {}: {}", path.display(), e);
                return ExtractionRecord::open_error(e.to_string());
            }
        };

        let record = self.extract_page(&page, layout_key);
        debug!(
            "Extracted {} fields from {} in {:?}",
            record.fields.len(),
            path.display(),
            start.elapsed()
        );
        record
    }

    /// Apply the template for `layout_key` to an already loaded page.
    pub fn extract_page<P: TextPage + ?Sized>(&self, page: &P, layout_key: &str) -> ExtractionRecord {
        match self.registry.get(layout_key) {
            Some(template) => ExtractionRecord::success(template.apply(page)),
            None => {
                warn!("No template registered for layout '{}'", layout_key);
                ExtractionRecord::unsupported_layout()
            }
        }
    }

    /// Extract jobs one after another, keeping input order.
    pub fn extract_batch(&self, jobs: &[BatchJob]) -> Vec<ExtractionRecord> {
        let records: Vec<ExtractionRecord> = jobs
            .iter()
            .map(|job| {
                self.extract(&job.path, &job.layout_key)
                    .with_source_group(job.group.clone())
            })
            .collect();

        let failed = records.iter().filter(|r| !r.status.is_success()).count();
        info!(
            "Extracted {} documents, {} not successful",
            records.len(),
            failed
        );
        records
    }

    /// Every rule's intermediate regions for one document.
    pub fn inspect(&self, path: &Path, layout_key: &str) -> Result<Vec<RuleTrace>> {
        let template = self
            .registry
            .get(layout_key)
            .ok_or_else(|| NotasError::UnsupportedLayout(layout_key.to_string()))?;
        let page = self.source.open_first_page(path)?;
        Ok(template.trace(&page))
    }
}
