// strata-core/src/infrastructure/config/document.rs

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::config::{JobDocument, RootDocument, StepDefinition, StepKind};
use crate::infrastructure::error::{DecodeError, InfrastructureError};

/// On-disk encodings accepted for configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Preferred first when looking a job document up by id.
    pub const EXTENSIONS: [&'static str; 3] = ["json", "yaml", "yml"];

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    pub fn decode(self, content: &str) -> Result<Value, DecodeError> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

/// Reads a document into an ordered generic tree.
pub fn read_value(path: &Path) -> Result<Value, InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        // Not UTF-8: the file is there but cannot be decoded
        ErrorKind::InvalidData => InfrastructureError::format(path, e),
        _ => InfrastructureError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    // Unknown extensions are read as YAML, which also accepts JSON.
    let format = DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Yaml);
    format
        .decode(&content)
        .map_err(|e| InfrastructureError::format(path, e))
}

// --- TREE -> RAW DOCUMENTS ---

fn shape(message: impl Into<String>) -> DecodeError {
    DecodeError::Shape(message.into())
}

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(shape(format!(
            "{} must be a mapping, got {}",
            what,
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Decodes one step: the `type` key picks the record, the rest fills it.
pub fn step_from_value(step_id: &str, value: Value) -> Result<StepDefinition, DecodeError> {
    let mut fields = into_object(value, &format!("step [{}]", step_id))?;

    let tag = match fields.remove("type") {
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(shape(format!(
                "step [{}]: 'type' must be a string, got {}",
                step_id,
                kind_of(&other)
            )));
        }
        None => return Err(shape(format!("step [{}] has no 'type' field", step_id))),
    };
    let kind = StepKind::from_tag(&tag).ok_or_else(|| {
        shape(format!(
            "step [{}] has unknown type [{}] (expected one of: {})",
            step_id,
            tag,
            StepKind::ALL.map(StepKind::tag).join(", ")
        ))
    })?;

    let fields = Value::Object(fields);
    let definition = match kind {
        StepKind::FileToDb => StepDefinition::FileToDb(record(step_id, fields)?),
        StepKind::DbToFile => StepDefinition::DbToFile(record(step_id, fields)?),
        StepKind::DbToDb => StepDefinition::DbToDb(record(step_id, fields)?),
        StepKind::Validation => StepDefinition::Validation(record(step_id, fields)?),
        StepKind::Truncate => StepDefinition::Truncate(record(step_id, fields)?),
    };
    Ok(definition)
}

fn record<T: DeserializeOwned>(step_id: &str, fields: Value) -> Result<T, DecodeError> {
    serde_json::from_value(fields).map_err(|e| shape(format!("step [{}]: {}", step_id, e)))
}

/// `{ "steps": { "<stepId>": { "type": ..., ... }, ... } }`
pub fn job_from_value(value: Value) -> Result<JobDocument, DecodeError> {
    let mut body = into_object(value, "job document")?;

    let steps = body
        .remove("steps")
        .ok_or_else(|| shape("job document has no 'steps' mapping"))?;
    // Shared settings belong to the settings source, not to a job.
    if let Some(key) = body.keys().next() {
        return Err(shape(format!("unknown field [{}] at job level", key)));
    }

    let steps = into_object(steps, "steps")?
        .into_iter()
        .map(|(step_id, step)| {
            let definition = step_from_value(&step_id, step)?;
            Ok((step_id, definition))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(JobDocument::new(steps))
}

/// `{ "jobs": { "<jobId>": { "steps": { ... } }, ... } }`
pub fn root_from_value(value: Value) -> Result<RootDocument, DecodeError> {
    let mut body = into_object(value, "root document")?;

    let jobs = body
        .remove("jobs")
        .ok_or_else(|| shape("root document has no 'jobs' mapping"))?;
    if let Some(key) = body.keys().next() {
        return Err(shape(format!("unknown field [{}] at root level", key)));
    }

    let jobs = into_object(jobs, "jobs")?
        .into_iter()
        .map(|(job_id, job)| {
            let document = job_from_value(job).map_err(|e| match e {
                DecodeError::Shape(message) => shape(format!("job [{}]: {}", job_id, message)),
                other => other,
            })?;
            Ok((job_id, document))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(RootDocument { jobs })
}
