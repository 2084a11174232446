// strata-core/src/application/merge.rs

use tracing::{info, instrument};

use crate::domain::config::JobConfig;
use crate::domain::merge::{MergeRequest, MergeSqlGeneratorFactory};
use crate::error::StrataError;
use crate::ports::ColumnSource;

pub struct MergeSqlService;

impl MergeSqlService {
    /// Renders the MERGE statement of a `db2db` step for the database behind `hint`.
    #[instrument(skip(job, columns), fields(job_id = job.job_id()))]
    pub fn render(
        job: &JobConfig,
        step_id: &str,
        hint: &str,
        columns: &dyn ColumnSource,
    ) -> Result<String, StrataError> {
        // 1. Step + generator (fail before touching metadata)
        let step = job.merge_step(step_id)?;
        let generator = MergeSqlGeneratorFactory::create(hint)?;

        // 2. Table metadata
        let all_columns = columns.fetch_columns(&step.table)?;

        // 3. Render
        let sql = generator.generate(&MergeRequest::for_step(step, &all_columns))?;
        info!(dialect = %generator.dialect(), table = %step.table, "MERGE statement ready");
        Ok(sql)
    }
}
