// strata-core/src/domain/merge/ansi.rs

use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::merge::{
    Dialect, MergeColumns, MergeRequest, MergeSqlGenerator, insert_clause, match_predicate,
    update_assignments,
};

/// `MERGE INTO t AS target USING (...) AS source ...`, shared by Oracle and SQL Server.
fn ansi_merge(
    dialect: Dialect,
    request: &MergeRequest<'_>,
    terminator: &str,
) -> Result<String, DomainError> {
    let columns = MergeColumns::plan(request)?;

    let mut sql = format!(
        "MERGE INTO {} AS target USING ({}) AS source ON ({})",
        request.table,
        request.source_selection(),
        match_predicate(&columns)
    );
    // Nothing to assign: insert-only merge
    if !columns.update.is_empty() {
        sql.push_str(" WHEN MATCHED THEN UPDATE SET ");
        sql.push_str(&update_assignments(&columns));
    }
    sql.push(' ');
    sql.push_str(&insert_clause(&columns));
    sql.push_str(terminator);

    debug!(%dialect, job = request.job_id, step = request.step_id, sql = %sql, "Generated MERGE");
    Ok(sql)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OracleMergeSqlGenerator;

impl MergeSqlGenerator for OracleMergeSqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn generate(&self, request: &MergeRequest<'_>) -> Result<String, DomainError> {
        ansi_merge(Dialect::Oracle, request, "")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerMergeSqlGenerator;

impl MergeSqlGenerator for SqlServerMergeSqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn generate(&self, request: &MergeRequest<'_>) -> Result<String, DomainError> {
        // SQL Server refuses a MERGE without its terminator
        ansi_merge(Dialect::SqlServer, request, ";")
    }
}
