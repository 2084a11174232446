// strata-core/src/domain/merge/mod.rs

pub mod ansi;
pub mod columns;
pub mod dialect;
pub mod h2;

pub use ansi::{OracleMergeSqlGenerator, SqlServerMergeSqlGenerator};
pub use columns::MergeColumns;
pub use dialect::{Dialect, MergeSqlGeneratorFactory};
pub use h2::H2MergeSqlGenerator;

use crate::domain::config::DbToDbStepConfig;
use crate::domain::error::DomainError;

/// Everything a generator needs to render one MERGE statement.
///
/// Identifiers are used verbatim: quoting and case are the caller's business.
#[derive(Debug, Clone, Copy)]
pub struct MergeRequest<'a> {
    pub job_id: &'a str,
    pub step_id: &'a str,
    pub table: &'a str,
    /// SELECT producing the source rows.
    pub source_sql: &'a str,
    /// Every column of the target table, in table order.
    pub all_columns: &'a [String],
    pub merge_on_columns: &'a [String],
    /// Explicit update list; `None` updates every non merge-on column.
    pub update_columns: Option<&'a [String]>,
}

impl<'a> MergeRequest<'a> {
    pub fn for_step(step: &'a DbToDbStepConfig, all_columns: &'a [String]) -> Self {
        Self {
            job_id: &step.job_id,
            step_id: &step.step_id,
            table: &step.table,
            source_sql: &step.sql,
            all_columns,
            merge_on_columns: &step.merge_on_columns,
            update_columns: step.update_columns.as_deref(),
        }
    }

    /// Source SQL without surrounding blanks or a trailing terminator.
    pub(crate) fn source_selection(&self) -> &'a str {
        self.source_sql.trim().trim_end_matches(';').trim_end()
    }
}

/// Renders MERGE statements for one database family.
///
/// Generators hold no state: one instance serves every thread.
pub trait MergeSqlGenerator: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn generate(&self, request: &MergeRequest<'_>) -> Result<String, DomainError>;
}

// --- CLAUSE BUILDERS (shared by every dialect) ---

pub(crate) fn match_predicate(columns: &MergeColumns<'_>) -> String {
    columns
        .merge_on
        .iter()
        .map(|c| format!("target.{c} = source.{c}"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

pub(crate) fn update_assignments(columns: &MergeColumns<'_>) -> String {
    columns
        .update
        .iter()
        .map(|c| format!("{c} = source.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn insert_clause(columns: &MergeColumns<'_>) -> String {
    let values = columns
        .insert
        .iter()
        .map(|c| format!("source.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
        columns.insert.join(", "),
        values
    )
}
