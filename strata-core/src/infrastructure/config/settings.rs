// strata-core/src/infrastructure/config/settings.rs

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::config::BasePath;
use crate::infrastructure::config::document::read_value;
use crate::infrastructure::error::{DecodeError, InfrastructureError};
use crate::ports::SettingsSource;

/// Environment variable overriding a shared base path.
pub fn env_var(kind: BasePath) -> &'static str {
    match kind {
        BasePath::Input => "STRATA_INPUT_FILE_BASE_PATH",
        BasePath::Output => "STRATA_OUTPUT_FILE_BASE_PATH",
        BasePath::SqlLoaderControl => "STRATA_SQL_LOADER_CONTROL_FILE_BASE_PATH",
        BasePath::SqlLoaderOutput => "STRATA_SQL_LOADER_OUTPUT_FILE_BASE_PATH",
    }
}

/// Shared settings: a flat key -> string map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Reads a flat YAML or JSON mapping. Scalars are kept as their text.
    pub fn from_file(path: &Path) -> Result<Self, InfrastructureError> {
        let values = match read_value(path)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let text = scalar_text(&key, value)
                        .map_err(|e| InfrastructureError::format(path, e))?;
                    Ok((key, text))
                })
                .collect::<Result<HashMap<_, _>, InfrastructureError>>()?,
            Value::Null => HashMap::new(),
            _ => {
                return Err(InfrastructureError::format(
                    path,
                    DecodeError::Shape("settings must be a flat mapping".to_string()),
                ));
            }
        };
        Ok(Self { values })
    }

    /// Layers overrides on top of the file values (`lookup` is `std::env::var` in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for kind in BasePath::ALL {
            if let Some(value) = lookup(env_var(kind)) {
                info!(key = kind.key(), var = env_var(kind), "Overriding setting via ENV");
                self.values.insert(kind.key().to_string(), value);
            }
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsSource for Settings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn scalar_text(key: &str, value: Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DecodeError::Shape(format!(
            "setting [{}] must be a scalar, got {}",
            key,
            if other.is_null() { "null" } else { "a nested value" }
        ))),
    }
}

/// Settings file (optional) plus `STRATA_*` environment overrides.
#[instrument]
pub fn load_settings(path: Option<&Path>) -> Result<Settings, InfrastructureError> {
    let settings = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading shared settings");
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}
