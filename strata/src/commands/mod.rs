// strata/src/commands/mod.rs

pub mod check;
pub mod merge;
pub mod show;

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use strata_core::domain::config::PathResolver;
use strata_core::infrastructure::config::load_settings;
use strata_core::ports::SettingsSource;

/// Shared settings (file + STRATA_* env) behind a path resolver.
pub fn path_resolver(settings: Option<&Path>) -> anyhow::Result<Arc<PathResolver>> {
    let settings = load_settings(settings).with_context(|| match settings {
        Some(path) => format!("Failed to load shared settings from {}", path.display()),
        None => "Failed to load shared settings".to_string(),
    })?;
    let source: Arc<dyn SettingsSource> = Arc::new(settings);
    Ok(Arc::new(PathResolver::new(source)))
}

pub fn settings_label(settings: &Option<PathBuf>) -> String {
    settings
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "environment only".to_string())
}
