//! Subcommands and the setup they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod inspect;
pub mod templates;

use std::path::{Path, PathBuf};

use tracing::debug;

use notas_core::models::config::NotasConfig;
use notas_core::TemplateRegistry;

/// `<config dir>/notas/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notas")
        .join("config.json")
}

/// Where the configuration lives and whether it was named explicitly.
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

impl ConfigLocation {
    /// `--config` if given, else the default path.
    pub fn resolve(config_path: Option<&str>) -> Self {
        match config_path {
            Some(path) => Self {
                path: PathBuf::from(path),
                explicit: true,
            },
            None => Self {
                path: default_config_path(),
                explicit: false,
            },
        }
    }

    /// Read the file. A missing default file means built-in defaults;
    /// a missing explicit file is an error.
    pub fn load(&self) -> anyhow::Result<NotasConfig> {
        if self.explicit || self.path.exists() {
            debug!("Using config from {}", self.path.display());
            Ok(NotasConfig::from_file(&self.path)?)
        } else {
            Ok(NotasConfig::default())
        }
    }
}

/// Config from `--config`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NotasConfig> {
    ConfigLocation::resolve(config_path).load()
}

/// Built-in templates plus any found in `template_dir`.
pub fn load_registry(
    config: &NotasConfig,
    template_dir: Option<&Path>,
) -> anyhow::Result<TemplateRegistry> {
    let mut registry = TemplateRegistry::builtin();

    if let Some(dir) = template_dir.or(config.extraction.template_dir.as_deref()) {
        registry.load_dir(dir)?;
    }

    Ok(registry)
}
