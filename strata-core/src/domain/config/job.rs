// strata-core/src/domain/config/job.rs

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::config::base_path::PathResolver;
use crate::domain::config::step::{DbToDbStepConfig, StepConfig, StepDefinition};
use crate::domain::error::DomainError;

// --- RAW TREES (decoded, not initialized) ---

/// Steps of one job in document order.
#[derive(Debug, Clone, Default)]
pub struct JobDocument {
    pub steps: Vec<(String, StepDefinition)>,
}

impl JobDocument {
    pub fn new(steps: Vec<(String, StepDefinition)>) -> Self {
        Self { steps }
    }

    /// Assigns the ids and initializes every step, in order.
    /// The first invalid step aborts the whole job.
    pub fn initialize(self, job_id: &str, resolver: &PathResolver) -> Result<JobConfig, DomainError> {
        let mut seen = HashSet::new();
        let mut steps = Vec::with_capacity(self.steps.len());

        for (step_id, definition) in self.steps {
            if !seen.insert(step_id.clone()) {
                return Err(DomainError::invalid("steps", "duplicate step id", job_id, &step_id));
            }
            debug!(job = job_id, step = %step_id, kind = %definition.kind(), "Initializing step");
            steps.push(definition.initialize(job_id, &step_id, resolver)?);
        }

        Ok(JobConfig {
            job_id: job_id.to_string(),
            steps,
        })
    }
}

/// Every job of a root-shaped document, in document order.
#[derive(Debug, Clone, Default)]
pub struct RootDocument {
    pub jobs: Vec<(String, JobDocument)>,
}

impl RootDocument {
    /// Takes one job out of the document.
    pub fn into_job(self, job_id: &str) -> Result<JobDocument, DomainError> {
        self.jobs
            .into_iter()
            .find(|(id, _)| id == job_id)
            .map(|(_, job)| job)
            .ok_or_else(|| DomainError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.jobs.iter().map(|(id, _)| id.as_str())
    }

    pub fn initialize(self, resolver: &PathResolver) -> Result<RootConfig, DomainError> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::with_capacity(self.jobs.len());
        for (job_id, job) in self.jobs {
            if !seen.insert(job_id.clone()) {
                return Err(DomainError::invalid("jobs", "duplicate job id", &job_id, ""));
            }
            jobs.push(job.initialize(&job_id, resolver)?);
        }
        Ok(RootConfig { jobs })
    }
}

// --- INITIALIZED TREES ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    job_id: String,
    steps: Vec<StepConfig>,
}

impl JobConfig {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Steps in document order.
    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(StepConfig::step_id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, step_id: &str) -> Result<&StepConfig, DomainError> {
        self.steps
            .iter()
            .find(|step| step.step_id() == step_id)
            .ok_or_else(|| DomainError::StepNotFound {
                job_id: self.job_id.clone(),
                step_id: step_id.to_string(),
            })
    }

    pub fn merge_step(&self, step_id: &str) -> Result<&DbToDbStepConfig, DomainError> {
        self.step(step_id)?.as_db_to_db()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    jobs: Vec<JobConfig>,
}

impl RootConfig {
    pub fn jobs(&self) -> &[JobConfig] {
        &self.jobs
    }

    pub fn job(&self, job_id: &str) -> Result<&JobConfig, DomainError> {
        self.jobs
            .iter()
            .find(|job| job.job_id() == job_id)
            .ok_or_else(|| DomainError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    pub fn step(&self, job_id: &str, step_id: &str) -> Result<&StepConfig, DomainError> {
        self.job(job_id)?.step(step_id)
    }
}
