//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::report::PLACEHOLDER;

/// Main configuration for notas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotasConfig {
    /// Page text reconstruction.
    pub page: PageConfig,

    /// Template and report settings.
    pub extraction: ExtractionConfig,

    /// Folder batch settings.
    pub batch: BatchConfig,
}

/// How positioned glyphs are grouped into lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Maximum distance (points) between glyph centres on the same line.
    pub line_tolerance: f32,

    /// Gap between glyphs, relative to glyph height, that reads as a space.
    pub space_gap_ratio: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            space_gap_ratio: 0.15,
        }
    }
}

/// Template and report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Directory with extra `*.json` templates loaded on top of the built-ins.
    pub template_dir: Option<PathBuf>,

    /// Value written into report cells that were never populated.
    pub placeholder: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

/// Folder batch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Root folder holding one sub-folder per municipality.
    pub input_root: PathBuf,

    /// Report file written by `notas batch`.
    pub output: PathBuf,

    /// Number of documents extracted concurrently.
    pub jobs: usize,

    /// Folder name to layout key. Unmapped folders use their own name.
    pub layouts: BTreeMap<String, String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("nf"),
            output: PathBuf::from("relatorio_consolidado_nf.csv"),
            jobs: 4,
            layouts: BTreeMap::new(),
        }
    }
}

impl BatchConfig {
    /// Layout key for a municipality folder.
    pub fn layout_for<'a>(&'a self, group: &'a str) -> &'a str {
        self.layouts.get(group).map(String::as_str).unwrap_or(group)
    }
}

impl NotasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
