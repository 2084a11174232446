// strata-core/src/domain/config/step.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::domain::config::base_path::{BasePath, PathResolver};
use crate::domain::error::DomainError;

// =============================================================================
//  1. STEP KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    FileToDb,
    DbToFile,
    DbToDb,
    Validation,
    Truncate,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::FileToDb,
        StepKind::DbToFile,
        StepKind::DbToDb,
        StepKind::Validation,
        StepKind::Truncate,
    ];

    /// Value of the `type` discriminator in configuration documents.
    pub fn tag(self) -> &'static str {
        match self {
            StepKind::FileToDb => "file2db",
            StepKind::DbToFile => "db2file",
            StepKind::DbToDb => "db2db",
            StepKind::Validation => "validation",
            StepKind::Truncate => "truncate",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationMode {
    /// Keep processing valid records, route invalid ones to the error table.
    Continue,
    /// Stop the step at the first invalid record.
    Abort,
}

// =============================================================================
//  2. RAW DEFINITIONS (as authored, before initialization)
// =============================================================================

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileToDbDefinition {
    pub bean: Option<String>,
    pub file_name: Option<String>,
    pub input_file_base_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DbToFileDefinition {
    pub bean: Option<String>,
    pub sql: Option<String>,
    pub sql_id: Option<String>,
    pub file_name: Option<String>,
    pub output_file_base_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DbToDbDefinition {
    pub bean: Option<String>,
    pub sql: Option<String>,
    pub merge_on_columns: Option<Vec<String>>,
    pub update_columns: Option<Vec<String>>,
    pub table: Option<String>,
    pub update_size: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationDefinition {
    pub bean: Option<String>,
    pub error_entity: Option<String>,
    pub mode: Option<ValidationMode>,
    pub error_limit: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TruncateDefinition {
    pub entities: Option<Vec<String>>,
}

/// One step as decoded from a document. Nothing is validated yet.
#[derive(Debug, Clone)]
pub enum StepDefinition {
    FileToDb(FileToDbDefinition),
    DbToFile(DbToFileDefinition),
    DbToDb(DbToDbDefinition),
    Validation(ValidationDefinition),
    Truncate(TruncateDefinition),
}

impl StepDefinition {
    pub fn kind(&self) -> StepKind {
        match self {
            StepDefinition::FileToDb(_) => StepKind::FileToDb,
            StepDefinition::DbToFile(_) => StepKind::DbToFile,
            StepDefinition::DbToDb(_) => StepKind::DbToDb,
            StepDefinition::Validation(_) => StepKind::Validation,
            StepDefinition::Truncate(_) => StepKind::Truncate,
        }
    }

    /// Validates the definition and resolves its base paths.
    ///
    /// Consumes the definition: the result is either a complete step or an
    /// error, never something half-initialized.
    pub fn initialize(
        self,
        job_id: &str,
        step_id: &str,
        resolver: &PathResolver,
    ) -> Result<StepConfig, DomainError> {
        let ctx = StepContext { job_id, step_id };
        let step = match self {
            StepDefinition::FileToDb(def) => StepConfig::FileToDb(FileToDbStepConfig {
                job_id: job_id.to_string(),
                step_id: step_id.to_string(),
                bean: ctx.required_text("bean", def.bean)?,
                file_name: ctx.required_text("fileName", def.file_name)?,
                input_file_base_path: ctx.base_path(
                    resolver,
                    BasePath::Input,
                    def.input_file_base_path.as_deref(),
                )?,
            }),
            StepDefinition::DbToFile(def) => StepConfig::DbToFile(DbToFileStepConfig {
                job_id: job_id.to_string(),
                step_id: step_id.to_string(),
                bean: ctx.required_text("bean", def.bean)?,
                sql: ctx.sql_source(def.sql, def.sql_id)?,
                file_name: ctx.required_text("fileName", def.file_name)?,
                output_file_base_path: ctx.base_path(
                    resolver,
                    BasePath::Output,
                    def.output_file_base_path.as_deref(),
                )?,
            }),
            StepDefinition::DbToDb(def) => {
                let bean = ctx.required_text("bean", def.bean)?;
                let merge_on_columns = ctx.column_list("mergeOnColumns", def.merge_on_columns)?;
                let update_columns = def
                    .update_columns
                    .map(|cols| ctx.column_list("updateColumns", Some(cols)))
                    .transpose()?;
                let table = match def.table {
                    Some(table) => ctx.non_blank("table", table)?,
                    None => table_name_for_bean(&bean),
                };
                StepConfig::DbToDb(DbToDbStepConfig {
                    job_id: job_id.to_string(),
                    step_id: step_id.to_string(),
                    sql: ctx.required_text("sql", def.sql)?,
                    bean,
                    merge_on_columns,
                    update_columns,
                    table,
                    update_size: ctx.positive("updateSize", def.update_size)?,
                })
            }
            StepDefinition::Validation(def) => StepConfig::Validation(ValidationStepConfig {
                job_id: job_id.to_string(),
                step_id: step_id.to_string(),
                bean: ctx.required_text("bean", def.bean)?,
                error_entity: ctx.required_text("errorEntity", def.error_entity)?,
                mode: def.mode.ok_or_else(|| ctx.required("mode"))?,
                error_limit: ctx.positive("errorLimit", def.error_limit)?,
            }),
            StepDefinition::Truncate(def) => StepConfig::Truncate(TruncateStepConfig {
                job_id: job_id.to_string(),
                step_id: step_id.to_string(),
                entities: ctx.text_list("entities", def.entities)?,
            }),
        };
        Ok(step)
    }
}

/// Field checks sharing the job/step ids used in every error message.
struct StepContext<'a> {
    job_id: &'a str,
    step_id: &'a str,
}

impl StepContext<'_> {
    fn required(&self, field: &str) -> DomainError {
        DomainError::required(field, self.job_id, self.step_id)
    }

    fn invalid(&self, field: &str, reason: impl Into<String>) -> DomainError {
        DomainError::invalid(field, reason, self.job_id, self.step_id)
    }

    fn required_text(&self, field: &str, value: Option<String>) -> Result<String, DomainError> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(self.required(field)),
        }
    }

    fn non_blank(&self, field: &str, value: String) -> Result<String, DomainError> {
        if value.trim().is_empty() {
            return Err(self.invalid(field, "must not be blank"));
        }
        Ok(value)
    }

    fn positive(&self, field: &str, value: Option<i64>) -> Result<Option<u32>, DomainError> {
        value
            .map(|n| {
                u32::try_from(n)
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| self.invalid(field, format!("must be a positive integer, got {}", n)))
            })
            .transpose()
    }

    fn text_list(&self, field: &str, value: Option<Vec<String>>) -> Result<Vec<String>, DomainError> {
        let items = value.unwrap_or_default();
        if items.is_empty() {
            return Err(self.required(field));
        }
        if items.iter().any(|item| item.trim().is_empty()) {
            return Err(self.invalid(field, "entries must not be blank"));
        }
        Ok(items)
    }

    /// Non-empty list of column names without case-insensitive duplicates.
    fn column_list(&self, field: &str, value: Option<Vec<String>>) -> Result<Vec<String>, DomainError> {
        let columns = self.text_list(field, value)?;
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.to_lowercase()) {
                return Err(self.invalid(field, format!("duplicate column [{}]", column)));
            }
        }
        Ok(columns)
    }

    fn sql_source(&self, sql: Option<String>, sql_id: Option<String>) -> Result<SqlSource, DomainError> {
        let sql = sql.filter(|s| !s.trim().is_empty());
        let sql_id = sql_id.filter(|s| !s.trim().is_empty());
        match (sql, sql_id) {
            (Some(sql), None) => Ok(SqlSource::Inline(sql)),
            (None, Some(id)) => Ok(SqlSource::Named(id)),
            (Some(_), Some(_)) => Err(self.invalid("sql", "specify either sql or sqlId, not both")),
            (None, None) => Err(self.required("sql")),
        }
    }

    fn base_path(
        &self,
        resolver: &PathResolver,
        kind: BasePath,
        step_override: Option<&Path>,
    ) -> Result<PathBuf, DomainError> {
        resolver
            .resolve(kind, step_override)
            .map_err(|_| self.invalid(kind.key(), "no step override and no shared setting"))
    }
}

fn re_camel_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([a-z0-9])([A-Z])|([A-Z]+)([A-Z][a-z])")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

/// Default table of a merge step: snake_case simple name of the bean type.
///
/// `com.example.PersonEntity` -> `person_entity`, `app::HTTPLog` -> `http_log`.
pub fn table_name_for_bean(bean: &str) -> String {
    let simple = bean
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(bean);
    re_camel_boundary()
        .replace_all(simple, "${1}${3}_${2}${4}")
        .to_lowercase()
}

// =============================================================================
//  3. INITIALIZED STEPS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SqlSource {
    /// SQL text written in the step.
    Inline(String),
    /// Id of a statement kept in an external SQL file.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileToDbStepConfig {
    pub job_id: String,
    pub step_id: String,
    pub bean: String,
    pub file_name: String,
    pub input_file_base_path: PathBuf,
}

impl FileToDbStepConfig {
    pub fn input_file(&self) -> PathBuf {
        self.input_file_base_path.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbToFileStepConfig {
    pub job_id: String,
    pub step_id: String,
    pub bean: String,
    pub sql: SqlSource,
    pub file_name: String,
    pub output_file_base_path: PathBuf,
}

impl DbToFileStepConfig {
    pub fn output_file(&self) -> PathBuf {
        self.output_file_base_path.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbToDbStepConfig {
    pub job_id: String,
    pub step_id: String,
    pub bean: String,
    pub sql: String,
    pub merge_on_columns: Vec<String>,
    /// `None` means every column except the merge-on columns.
    pub update_columns: Option<Vec<String>>,
    pub table: String,
    pub update_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStepConfig {
    pub job_id: String,
    pub step_id: String,
    pub bean: String,
    pub error_entity: String,
    pub mode: ValidationMode,
    /// `None` means unlimited.
    pub error_limit: Option<u32>,
}

impl ValidationStepConfig {
    pub fn is_over_limit(&self, error_count: u64) -> bool {
        self.error_limit
            .is_some_and(|limit| error_count > u64::from(limit))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncateStepConfig {
    pub job_id: String,
    pub step_id: String,
    pub entities: Vec<String>,
}

/// A validated step, owned by exactly one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum StepConfig {
    #[serde(rename = "file2db")]
    FileToDb(FileToDbStepConfig),
    #[serde(rename = "db2file")]
    DbToFile(DbToFileStepConfig),
    #[serde(rename = "db2db")]
    DbToDb(DbToDbStepConfig),
    #[serde(rename = "validation")]
    Validation(ValidationStepConfig),
    #[serde(rename = "truncate")]
    Truncate(TruncateStepConfig),
}

impl StepConfig {
    pub fn kind(&self) -> StepKind {
        match self {
            StepConfig::FileToDb(_) => StepKind::FileToDb,
            StepConfig::DbToFile(_) => StepKind::DbToFile,
            StepConfig::DbToDb(_) => StepKind::DbToDb,
            StepConfig::Validation(_) => StepKind::Validation,
            StepConfig::Truncate(_) => StepKind::Truncate,
        }
    }

    pub fn step_id(&self) -> &str {
        match self {
            StepConfig::FileToDb(s) => &s.step_id,
            StepConfig::DbToFile(s) => &s.step_id,
            StepConfig::DbToDb(s) => &s.step_id,
            StepConfig::Validation(s) => &s.step_id,
            StepConfig::Truncate(s) => &s.step_id,
        }
    }

    pub fn job_id(&self) -> &str {
        match self {
            StepConfig::FileToDb(s) => &s.job_id,
            StepConfig::DbToFile(s) => &s.job_id,
            StepConfig::DbToDb(s) => &s.job_id,
            StepConfig::Validation(s) => &s.job_id,
            StepConfig::Truncate(s) => &s.job_id,
        }
    }

    pub fn as_db_to_db(&self) -> Result<&DbToDbStepConfig, DomainError> {
        match self {
            StepConfig::DbToDb(step) => Ok(step),
            other => Err(DomainError::UnexpectedStepKind {
                expected: StepKind::DbToDb.tag().to_string(),
                job_id: other.job_id().to_string(),
                step_id: other.step_id().to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::SettingsSource;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn resolver(pairs: &[(&str, &str)]) -> PathResolver {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let settings: Arc<dyn SettingsSource> = Arc::new(map);
        PathResolver::new(settings)
    }

    fn merge_definition() -> DbToDbDefinition {
        DbToDbDefinition {
            bean: Some("com.example.PersonEntity".into()),
            sql: Some("SELECT id, name, age FROM src_person".into()),
            merge_on_columns: Some(vec!["id".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in StepKind::ALL {
            assert_eq!(StepKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(StepKind::from_tag("db2DB"), None);
    }

    #[test]
    fn test_file_to_db_falls_back_to_shared_input_path() {
        let def = StepDefinition::FileToDb(FileToDbDefinition {
            bean: Some("Person".into()),
            file_name: Some("person.csv".into()),
            input_file_base_path: None,
        });
        let step = def
            .initialize("job1", "step1", &resolver(&[("inputFileBasePath", "/data/in")]))
            .unwrap();
        match step {
            StepConfig::FileToDb(step) => {
                assert_eq!(step.step_id, "step1");
                assert_eq!(step.input_file(), PathBuf::from("/data/in/person.csv"));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_file_to_db_override_beats_shared_path() {
        let def = StepDefinition::FileToDb(FileToDbDefinition {
            bean: Some("Person".into()),
            file_name: Some("person.csv".into()),
            input_file_base_path: Some("/override".into()),
        });
        let step = def.initialize("job1", "step1", &resolver(&[])).unwrap();
        match step {
            StepConfig::FileToDb(step) => {
                assert_eq!(step.input_file_base_path, PathBuf::from("/override"))
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_missing_shared_path_names_the_key() {
        let def = StepDefinition::DbToFile(DbToFileDefinition {
            bean: Some("Person".into()),
            sql_id: Some("SELECT_PERSON".into()),
            file_name: Some("out.csv".into()),
            ..Default::default()
        });
        let err = def.initialize("job1", "export", &resolver(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "outputFileBasePath is invalid: no step override and no shared setting. jobId = [job1], stepId = [export]"
        );
    }

    #[test]
    fn test_required_field_message() {
        let def = StepDefinition::FileToDb(FileToDbDefinition {
            bean: None,
            file_name: Some("person.csv".into()),
            input_file_base_path: Some("/in".into()),
        });
        let err = def.initialize("job1", "step1", &resolver(&[])).unwrap_err();
        assert_eq!(err.to_string(), "bean is required. jobId = [job1], stepId = [step1]");
    }

    #[test]
    fn test_db_to_file_rejects_both_sql_forms() {
        let def = StepDefinition::DbToFile(DbToFileDefinition {
            bean: Some("Person".into()),
            sql: Some("SELECT 1".into()),
            sql_id: Some("SELECT_ONE".into()),
            file_name: Some("out.csv".into()),
            output_file_base_path: Some("/out".into()),
        });
        let err = def.initialize("job1", "step1", &resolver(&[])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { ref field, .. } if field == "sql"));
    }

    #[test]
    fn test_empty_merge_on_columns_rejected() {
        let def = StepDefinition::DbToDb(DbToDbDefinition {
            merge_on_columns: Some(vec![]),
            ..merge_definition()
        });
        let err = def.initialize("job1", "merge", &resolver(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "mergeOnColumns is required. jobId = [job1], stepId = [merge]"
        );
    }

    #[test]
    fn test_duplicate_merge_on_columns_rejected_case_insensitively() {
        let def = StepDefinition::DbToDb(DbToDbDefinition {
            merge_on_columns: Some(vec!["id".into(), "ID".into()]),
            ..merge_definition()
        });
        let err = def.initialize("job1", "merge", &resolver(&[])).unwrap_err();
        assert!(err.to_string().contains("duplicate column [ID]"));
    }

    #[test]
    fn test_merge_step_derives_table_from_bean() {
        let step = StepDefinition::DbToDb(merge_definition())
            .initialize("job1", "merge", &resolver(&[]))
            .unwrap();
        let step = step.as_db_to_db().unwrap();
        assert_eq!(step.table, "person_entity");
        assert_eq!(step.update_columns, None);
    }

    #[test]
    fn test_empty_update_columns_rejected_when_given() {
        let def = StepDefinition::DbToDb(DbToDbDefinition {
            update_columns: Some(vec![]),
            ..merge_definition()
        });
        let err = def.initialize("job1", "merge", &resolver(&[])).unwrap_err();
        assert!(matches!(err, DomainError::RequiredField { ref field, .. } if field == "updateColumns"));
    }

    #[test]
    fn test_update_size_must_be_positive() {
        let def = StepDefinition::DbToDb(DbToDbDefinition {
            update_size: Some(0),
            ..merge_definition()
        });
        let err = def.initialize("job1", "merge", &resolver(&[])).unwrap_err();
        assert!(err.to_string().starts_with("updateSize is invalid"));
    }

    #[test]
    fn test_validation_step_limits() {
        let def = StepDefinition::Validation(ValidationDefinition {
            bean: Some("Person".into()),
            error_entity: Some("PersonError".into()),
            mode: Some(ValidationMode::Continue),
            error_limit: Some(10),
        });
        let step = def.initialize("job1", "validate", &resolver(&[])).unwrap();
        match step {
            StepConfig::Validation(step) => {
                assert!(!step.is_over_limit(10));
                assert!(step.is_over_limit(11));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_validation_step_without_limit_is_unlimited() {
        let def = StepDefinition::Validation(ValidationDefinition {
            bean: Some("Person".into()),
            error_entity: Some("PersonError".into()),
            mode: Some(ValidationMode::Abort),
            error_limit: None,
        });
        let step = def.initialize("job1", "validate", &resolver(&[])).unwrap();
        match step {
            StepConfig::Validation(step) => assert!(!step.is_over_limit(u64::MAX)),
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_validation_negative_limit_rejected() {
        let def = StepDefinition::Validation(ValidationDefinition {
            bean: Some("Person".into()),
            error_entity: Some("PersonError".into()),
            mode: Some(ValidationMode::Abort),
            error_limit: Some(-1),
        });
        let err = def.initialize("job1", "validate", &resolver(&[])).unwrap_err();
        assert!(err.to_string().contains("must be a positive integer, got -1"));
    }

    #[test]
    fn test_truncate_requires_entities() {
        let def = StepDefinition::Truncate(TruncateDefinition { entities: None });
        let err = def.initialize("job1", "cleanup", &resolver(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "entities is required. jobId = [job1], stepId = [cleanup]"
        );
    }

    #[test]
    fn test_table_name_for_bean() {
        assert_eq!(table_name_for_bean("com.example.PersonEntity"), "person_entity");
        assert_eq!(table_name_for_bean("app::HTTPLog"), "http_log");
        assert_eq!(table_name_for_bean("person"), "person");
    }

    #[test]
    fn test_non_merge_step_is_not_db_to_db() {
        let step = StepDefinition::Truncate(TruncateDefinition {
            entities: Some(vec!["Person".into()]),
        })
        .initialize("job1", "cleanup", &resolver(&[]))
        .unwrap();
        let err = step.as_db_to_db().unwrap_err();
        assert_eq!(
            err.to_string(),
            "step is not a db2db step. jobId = [job1], stepId = [cleanup]"
        );
    }
}
