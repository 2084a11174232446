// strata/src/commands/merge.rs
//
// USE CASE: Print the MERGE statement of a db2db step.
// Only the statement goes to stdout, so the output can be piped to a SQL client.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use strata_core::application::{ConfigCache, MergeSqlService};
use strata_core::infrastructure::adapters::StaticColumnSource;
use strata_core::infrastructure::config::JobFileLoader;

use super::path_resolver;

pub fn execute(
    config_dir: PathBuf,
    job: String,
    step: String,
    url: String,
    columns: Vec<String>,
    settings: Option<PathBuf>,
) -> anyhow::Result<()> {
    let resolver = path_resolver(settings.as_deref())?;
    let cache = ConfigCache::new(Arc::new(JobFileLoader::new(&config_dir)), resolver);
    let config = cache
        .get_or_load(&job)
        .with_context(|| format!("Failed to load job '{}' from {}", job, config_dir.display()))?;

    info!(job = %job, steps = config.len(), "Job loaded");

    // The given columns describe the step's target table
    let table = &config.merge_step(&step)?.table;
    let metadata = StaticColumnSource::new().with_table(table, columns.iter().map(|c| c.trim()));

    let sql = MergeSqlService::render(&config, &step, &url, &metadata)?;
    info!(job = %job, step = %step, table = %table, "MERGE generated");
    println!("{}", sql);
    Ok(())
}
