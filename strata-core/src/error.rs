// strata-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StrataError {
    // --- DOMAIN ERRORS (validation, lookups, dialects) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (files, decoding) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    #[diagnostic(code(strata::internal))]
    Internal(String),
}

impl StrataError {
    /// The document decoded but failed semantic validation.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            StrataError::Domain(DomainError::RequiredField { .. } | DomainError::InvalidField { .. })
        )
    }

    /// A configuration document or a shared setting does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StrataError::Domain(DomainError::SettingNotFound { .. })
                | StrataError::Infrastructure(InfrastructureError::ConfigNotFound { .. })
        )
    }

    pub fn is_format(&self) -> bool {
        matches!(
            self,
            StrataError::Infrastructure(InfrastructureError::ConfigFormat { .. })
        )
    }
}

impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::Infrastructure(InfrastructureError::Io(err))
    }
}
