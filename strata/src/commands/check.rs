// strata/src/commands/check.rs
//
// USE CASE: Load + validate every job, report each failure, fail if any.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use strata_core::StrataError;
use strata_core::application::ConfigCache;
use strata_core::domain::config::PathResolver;
use strata_core::infrastructure::config::{JobFileLoader, RootFileLoader};

use super::{path_resolver, settings_label};

pub fn execute(
    config_dir: Option<PathBuf>,
    root_config: Option<PathBuf>,
    settings: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("🔎 Checking ETL configuration...");
    println!("   Settings: {}", settings_label(&settings));
    let resolver = path_resolver(settings.as_deref())?;

    let results = match (config_dir, root_config) {
        (_, Some(root)) => check_root(root, &resolver)?,
        (Some(dir), None) => check_dir(dir, resolver)?,
        (None, None) => anyhow::bail!("Either --config-dir or --root-config is required"),
    };

    let total = results.len();
    let mut failed = 0;
    for (job_id, result) in results {
        match result {
            Ok(steps) => {
                info!(job = %job_id, steps, "Job valid");
                println!("   ✅ {} ({} steps)", job_id, steps);
            }
            Err(e) => {
                failed += 1;
                debug!(job = %job_id, error = %e, "Job invalid");
                eprintln!("   ❌ {}", job_id);
                eprintln!("{:?}", miette::Report::new(e));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} job(s) failed validation", failed, total);
    }
    println!("✨ {} job(s) valid", total);
    Ok(())
}

type JobResult = (String, Result<usize, StrataError>);

fn check_dir(dir: PathBuf, resolver: Arc<PathResolver>) -> anyhow::Result<Vec<JobResult>> {
    let loader = JobFileLoader::new(&dir);
    let job_ids = loader.job_ids()?;
    println!("   {} job document(s) in {}", job_ids.len(), dir.display());

    let cache = ConfigCache::new(Arc::new(loader), resolver);
    Ok(job_ids
        .into_iter()
        .map(|job_id| {
            let result = cache.get_or_load(&job_id).map(|job| job.len());
            (job_id, result)
        })
        .collect())
}

fn check_root(path: PathBuf, resolver: &PathResolver) -> anyhow::Result<Vec<JobResult>> {
    // A broken root document fails every job at once
    let root = RootFileLoader::new(&path).load_root()?;
    println!("   {} job(s) in {}", root.jobs.len(), path.display());

    Ok(root
        .jobs
        .into_iter()
        .map(|(job_id, job)| {
            let result = job
                .initialize(&job_id, resolver)
                .map(|job| job.len())
                .map_err(StrataError::from);
            (job_id, result)
        })
        .collect())
}
