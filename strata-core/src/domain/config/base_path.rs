// strata-core/src/domain/config/base_path.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::ports::SettingsSource;

/// The four shared base-path settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasePath {
    Input,
    Output,
    SqlLoaderControl,
    SqlLoaderOutput,
}

impl BasePath {
    pub const ALL: [BasePath; 4] = [
        BasePath::Input,
        BasePath::Output,
        BasePath::SqlLoaderControl,
        BasePath::SqlLoaderOutput,
    ];

    /// Key of the setting in the shared settings source.
    pub fn key(self) -> &'static str {
        match self {
            BasePath::Input => "inputFileBasePath",
            BasePath::Output => "outputFileBasePath",
            BasePath::SqlLoaderControl => "sqlLoaderControlFileBasePath",
            BasePath::SqlLoaderOutput => "sqlLoaderOutputFileBasePath",
        }
    }

    fn slot(self) -> usize {
        match self {
            BasePath::Input => 0,
            BasePath::Output => 1,
            BasePath::SqlLoaderControl => 2,
            BasePath::SqlLoaderOutput => 3,
        }
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves base paths: a step override wins, otherwise the shared setting.
///
/// Shared values are read at most once per kind. Once a kind resolved, the
/// settings source is never consulted for it again.
pub struct PathResolver {
    settings: Arc<dyn SettingsSource>,
    resolved: [OnceLock<PathBuf>; 4],
}

impl PathResolver {
    pub fn new(settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            settings,
            resolved: Default::default(),
        }
    }

    pub fn resolve(&self, kind: BasePath, step_override: Option<&Path>) -> Result<PathBuf, DomainError> {
        if let Some(path) = step_override {
            return Ok(path.to_path_buf());
        }
        self.shared(kind).map(Path::to_path_buf)
    }

    /// The shared value for `kind`, ignoring any step override.
    pub fn shared(&self, kind: BasePath) -> Result<&Path, DomainError> {
        let cell = &self.resolved[kind.slot()];
        if let Some(path) = cell.get() {
            return Ok(path);
        }

        let raw = self
            .settings
            .get(kind.key())
            .ok_or_else(|| DomainError::SettingNotFound {
                key: kind.key().to_string(),
            })?;

        // Concurrent first lookups may both read the source; only one value is kept.
        let path = cell.get_or_init(|| {
            debug!(key = kind.key(), path = %raw, "Resolved shared base path");
            PathBuf::from(raw)
        });
        Ok(path)
    }
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver")
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

/// All four shared base paths, resolved eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonConfig {
    pub input_file_base_path: PathBuf,
    pub output_file_base_path: PathBuf,
    pub sql_loader_control_file_base_path: PathBuf,
    pub sql_loader_output_file_base_path: PathBuf,
}

impl CommonConfig {
    pub fn resolve(resolver: &PathResolver) -> Result<Self, DomainError> {
        Ok(Self {
            input_file_base_path: resolver.shared(BasePath::Input)?.to_path_buf(),
            output_file_base_path: resolver.shared(BasePath::Output)?.to_path_buf(),
            sql_loader_control_file_base_path: resolver
                .shared(BasePath::SqlLoaderControl)?
                .to_path_buf(),
            sql_loader_output_file_base_path: resolver
                .shared(BasePath::SqlLoaderOutput)?
                .to_path_buf(),
        })
    }

    pub fn get(&self, kind: BasePath) -> &Path {
        match kind {
            BasePath::Input => &self.input_file_base_path,
            BasePath::Output => &self.output_file_base_path,
            BasePath::SqlLoaderControl => &self.sql_loader_control_file_base_path,
            BasePath::SqlLoaderOutput => &self.sql_loader_output_file_base_path,
        }
    }
}
