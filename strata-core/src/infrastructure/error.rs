// strata-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Decoder failure, whichever document format was read.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Shape(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(strata::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG DOCUMENTS ---
    #[error("etl config file was not found. file = [{}]", path.display())]
    #[diagnostic(code(strata::infra::config_missing))]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read etl config file. file = [{}]: {source}", path.display())]
    #[diagnostic(
        code(strata::infra::config_read),
        help("Check file permissions.")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load etl config file. file = [{}]: {source}", path.display())]
    #[diagnostic(
        code(strata::infra::config_format),
        help("Check the document syntax and the 'type' of every step.")
    )]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    // --- COLUMN METADATA ---
    #[error("no column metadata for table [{table}]")]
    #[diagnostic(
        code(strata::infra::unknown_table),
        help("Pass the table columns explicitly (e.g. --columns id,name).")
    )]
    UnknownTable { table: String },
}

impl InfrastructureError {
    pub fn format(path: impl Into<PathBuf>, source: impl Into<DecodeError>) -> Self {
        InfrastructureError::ConfigFormat {
            path: path.into(),
            source: source.into(),
        }
    }
}
