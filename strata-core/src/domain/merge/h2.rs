// strata-core/src/domain/merge/h2.rs

use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::merge::{
    Dialect, MergeColumns, MergeRequest, MergeSqlGenerator, insert_clause, match_predicate,
    update_assignments,
};

/// H2 takes the same MERGE ... USING statement, but aliases without `AS`.
/// It has no insert-only form: a step with nothing left to update is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2MergeSqlGenerator;

impl MergeSqlGenerator for H2MergeSqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::H2
    }

    fn generate(&self, request: &MergeRequest<'_>) -> Result<String, DomainError> {
        let columns = MergeColumns::plan(request)?;
        if columns.update.is_empty() {
            return Err(DomainError::invalid(
                "updateColumns",
                "no column left to update after excluding mergeOnColumns",
                request.job_id,
                request.step_id,
            ));
        }

        let sql = format!(
            "MERGE INTO {} target USING ({}) source ON ({}) WHEN MATCHED THEN UPDATE SET {} {}",
            request.table,
            request.source_selection(),
            match_predicate(&columns),
            update_assignments(&columns),
            insert_clause(&columns)
        );

        debug!(dialect = %Dialect::H2, job = request.job_id, step = request.step_id, sql = %sql, "Generated MERGE");
        Ok(sql)
    }
}
