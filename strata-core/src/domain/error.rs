// strata-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} is required. jobId = [{job_id}], stepId = [{step_id}]")]
    #[diagnostic(
        code(strata::domain::required),
        help("Add '{field}' to the step definition.")
    )]
    RequiredField {
        field: String,
        job_id: String,
        step_id: String,
    },

    #[error("{field} is invalid: {reason}. jobId = [{job_id}], stepId = [{step_id}]")]
    #[diagnostic(code(strata::domain::invalid))]
    InvalidField {
        field: String,
        reason: String,
        job_id: String,
        step_id: String,
    },

    #[error("{key} is not found. Check the config file.")]
    #[diagnostic(
        code(strata::domain::setting_missing),
        help("Define '{key}' in the settings file or override it on the step.")
    )]
    SettingNotFound { key: String },

    #[error("job configuration was not found. jobId = [{job_id}]")]
    #[diagnostic(code(strata::domain::job_not_found))]
    JobNotFound { job_id: String },

    #[error("step configuration was not found. jobId = [{job_id}], stepId = [{step_id}]")]
    #[diagnostic(code(strata::domain::step_not_found))]
    StepNotFound { job_id: String, step_id: String },

    #[error("step is not a {expected} step. jobId = [{job_id}], stepId = [{step_id}]")]
    #[diagnostic(code(strata::domain::step_kind))]
    UnexpectedStepKind {
        expected: String,
        job_id: String,
        step_id: String,
    },

    #[error("database that can not use merge. database url: {hint}")]
    #[diagnostic(
        code(strata::domain::dialect),
        help("Supported databases are Oracle, H2 and SQL Server.")
    )]
    UnsupportedDialect { hint: String },
}

impl DomainError {
    pub fn required(field: &str, job_id: &str, step_id: &str) -> Self {
        DomainError::RequiredField {
            field: field.to_string(),
            job_id: job_id.to_string(),
            step_id: step_id.to_string(),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>, job_id: &str, step_id: &str) -> Self {
        DomainError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
            job_id: job_id.to_string(),
            step_id: step_id.to_string(),
        }
    }
}
