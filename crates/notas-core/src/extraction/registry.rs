//! Registry mapping layout keys to templates.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, info};

use super::builtin::builtin_templates;
use super::template::Template;
use crate::error::TemplateError;

/// Read-only after start-up; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in layout.
    pub fn builtin() -> Self {
        let templates = builtin_templates()
            .into_iter()
            .map(|t| {
                debug_assert!(t.validate().is_ok(), "invalid built-in layout '{}'", t.layout_key);
                (t.layout_key.clone(), t)
            })
            .collect();
        Self { templates }
    }

    /// Add a template, replacing any previous one with the same key.
    pub fn register(&mut self, template: Template) -> Result<Option<Template>, TemplateError> {
        template.validate()?;
        debug!(
            "Registered layout '{}' with {} rules",
            template.layout_key,
            template.rules.len()
        );
        Ok(self.templates.insert(template.layout_key.clone(), template))
    }

    /// Load one JSON template file. Returns its layout key.
    pub fn load_file(&mut self, path: &Path) -> Result<String, TemplateError> {
        let load_err = |reason: String| TemplateError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let template: Template =
            serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;
        let key = template.layout_key.clone();

        if self.register(template)?.is_some() {
            info!("Layout '{}' overridden by {}", key, path.display());
        }
        Ok(key)
    }

    /// Load every `*.json` file of a directory, in file name order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, TemplateError> {
        let load_err = |reason: &str| TemplateError::Load {
            path: dir.to_path_buf(),
            reason: reason.to_string(),
        };

        if !dir.is_dir() {
            return Err(load_err("not a directory"));
        }
        let dir_str = dir.to_str().ok_or_else(|| load_err("path is not valid UTF-8"))?;
        let pattern = format!("{}/*.json", Pattern::escape(dir_str));
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };

        let files: Vec<_> = glob_with(&pattern, options)
            .map_err(|e| load_err(&e.to_string()))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();

        for file in &files {
            self.load_file(file)?;
        }

        info!("Loaded {} templates from {}", files.len(), dir.display());
        Ok(files.len())
    }

    /// Template for a layout key.
    pub fn get(&self, layout_key: &str) -> Option<&Template> {
        self.templates.get(layout_key)
    }

    pub fn contains(&self, layout_key: &str) -> bool {
        self.templates.contains_key(layout_key)
    }

    /// Registered layout keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
