// strata-core/src/infrastructure/config/loader.rs

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::config::{JobDocument, RootDocument};
use crate::error::StrataError;
use crate::infrastructure::config::document::{
    DocumentFormat, job_from_value, read_value, root_from_value,
};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::ConfigLoader;

// --- JOB-SCOPED DOCUMENTS (<dir>/<jobId>.json|yaml|yml) ---

#[derive(Debug, Clone)]
pub struct JobFileLoader {
    dir: PathBuf,
}

impl JobFileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First existing candidate; the `.json` path when none exists, so the
    /// not-found error names a concrete file.
    pub fn locate(&self, job_id: &str) -> PathBuf {
        DocumentFormat::EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", job_id, ext)))
            .find(|path| path.is_file())
            .unwrap_or_else(|| self.dir.join(format!("{}.json", job_id)))
    }

    /// Job ids of every document in the directory, sorted.
    pub fn job_ids(&self) -> Result<Vec<String>, StrataError> {
        if !self.dir.is_dir() {
            return Err(InfrastructureError::ConfigNotFound {
                path: self.dir.clone(),
            }
            .into());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| StrataError::Internal(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || DocumentFormat::from_path(path).is_none() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl ConfigLoader for JobFileLoader {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load_job(&self, job_id: &str) -> Result<JobDocument, StrataError> {
        let path = self.locate(job_id);
        info!(path = %path.display(), "Loading job config");

        let value = read_value(&path)?;
        let document =
            job_from_value(value).map_err(|e| InfrastructureError::format(&path, e))?;
        debug!(steps = document.steps.len(), "Job config decoded");
        Ok(document)
    }
}

// --- ROOT DOCUMENT ({ "jobs": { ... } }) ---

#[derive(Debug, Clone)]
pub struct RootFileLoader {
    path: PathBuf,
}

impl RootFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load_root(&self) -> Result<RootDocument, StrataError> {
        info!("Loading root config");
        let value = read_value(&self.path)?;
        let root =
            root_from_value(value).map_err(|e| InfrastructureError::format(&self.path, e))?;
        debug!(jobs = root.jobs.len(), "Root config decoded");
        Ok(root)
    }
}

impl ConfigLoader for RootFileLoader {
    fn load_job(&self, job_id: &str) -> Result<JobDocument, StrataError> {
        Ok(self.load_root()?.into_job(job_id)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::config::StepKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_json_job() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("job1.json"),
            r#"{"steps":{"load":{"type":"file2db","bean":"Person","fileName":"p.csv"}}}"#,
        )
        .unwrap();

        let doc = JobFileLoader::new(dir.path()).load_job("job1").unwrap();
        assert_eq!(doc.steps.len(), 1);
        assert_eq!(doc.steps[0].1.kind(), StepKind::FileToDb);
    }

    #[test]
    fn test_load_yaml_job() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("job2.yml"),
            "steps:\n  cleanup:\n    type: truncate\n    entities:\n      - Person\n",
        )
        .unwrap();

        let doc = JobFileLoader::new(dir.path()).load_job("job2").unwrap();
        assert_eq!(doc.steps[0].0, "cleanup");
    }

    #[test]
    fn test_missing_job_document() {
        let dir = tempdir().unwrap();
        let err = JobFileLoader::new(dir.path()).load_job("ghost").unwrap_err();

        assert!(err.is_not_found());
        let expected = format!(
            "etl config file was not found. file = [{}]",
            dir.path().join("ghost.json").display()
        );
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_malformed_document_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job1.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JobFileLoader::new(dir.path()).load_job("job1").unwrap_err();
        assert!(err.is_format());
        assert!(
            err.to_string()
                .starts_with(&format!("failed to load etl config file. file = [{}]", path.display()))
        );
    }

    #[test]
    fn test_non_utf8_document_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job1.json");
        fs::write(&path, b"{\"steps\": {\"a\": \"\xff\xfe\"}}").unwrap();

        let err = JobFileLoader::new(dir.path()).load_job("job1").unwrap_err();
        assert!(err.is_format());
        assert!(
            err.to_string()
                .starts_with(&format!("failed to load etl config file. file = [{}]", path.display()))
        );
    }

    #[test]
    fn test_missing_type_is_format_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("job1.json"),
            r#"{"steps":{"load":{"bean":"Person"}}}"#,
        )
        .unwrap();

        let err = JobFileLoader::new(dir.path()).load_job("job1").unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().ends_with("step [load] has no 'type' field"));
    }

    #[test]
    fn test_job_ids_lists_documents() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "steps: {}\n").unwrap();
        fs::write(dir.path().join("a.json"), r#"{"steps":{}}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids = JobFileLoader::new(dir.path()).job_ids().unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_root_loader_extracts_job() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("etl.yaml");
        fs::write(
            &path,
            "jobs:\n  job1:\n    steps:\n      cleanup:\n        type: truncate\n        entities: [Person]\n",
        )
        .unwrap();

        let loader = RootFileLoader::new(&path);
        assert_eq!(loader.load_job("job1").unwrap().steps.len(), 1);

        let err = loader.load_job("job9").unwrap_err();
        assert_eq!(err.to_string(), "job configuration was not found. jobId = [job9]");
    }
}
