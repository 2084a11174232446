// strata-core/src/ports/loader.rs

use crate::domain::config::JobDocument;
use crate::error::StrataError;

/// Produces the raw (not yet initialized) configuration tree of one job.
///
/// Implementations decode documents; they never initialize them. Whoever
/// calls `load_job` owns the initialization step.
pub trait ConfigLoader: Send + Sync {
    fn load_job(&self, job_id: &str) -> Result<JobDocument, StrataError>;
}
