// strata-core/src/application/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use tracing::{debug, info, instrument};

use crate::domain::config::{JobConfig, PathResolver};
use crate::error::StrataError;
use crate::ports::ConfigLoader;

fn poisoned(what: &str) -> StrataError {
    StrataError::Internal(format!("config cache {} lock poisoned", what))
}

#[derive(Default)]
struct Published {
    jobs: HashMap<String, Arc<JobConfig>>,
    // Bumped by every reset. A load started before a reset never publishes.
    generation: u64,
}

/// Loaded and initialized job configurations, one per job id.
///
/// A job is loaded at most once until `reset`: concurrent callers asking for
/// the same job wait for the first one and share its result.
pub struct ConfigCache {
    loader: Arc<dyn ConfigLoader>,
    resolver: Arc<PathResolver>,
    published: RwLock<Published>,
    // One guard per job id, held while that job loads. Kept across resets.
    loading: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

static PROCESS_WIDE: OnceLock<ConfigCache> = OnceLock::new();

impl ConfigCache {
    pub fn new(loader: Arc<dyn ConfigLoader>, resolver: Arc<PathResolver>) -> Self {
        Self {
            loader,
            resolver,
            published: RwLock::new(Published::default()),
            loading: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide cache. `init` runs on the first call only.
    pub fn process_wide(init: impl FnOnce() -> ConfigCache) -> &'static ConfigCache {
        PROCESS_WIDE.get_or_init(init)
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Cached job (if any) and the current generation.
    fn lookup(&self, job_id: &str) -> Result<(Option<Arc<JobConfig>>, u64), StrataError> {
        let published = self.published.read().map_err(|_| poisoned("entries"))?;
        Ok((published.jobs.get(job_id).cloned(), published.generation))
    }

    fn guard_for(&self, job_id: &str) -> Result<Arc<Mutex<()>>, StrataError> {
        let mut loading = self.loading.lock().map_err(|_| poisoned("loading"))?;
        Ok(Arc::clone(loading.entry(job_id.to_string()).or_default()))
    }

    #[instrument(skip(self))]
    pub fn get_or_load(&self, job_id: &str) -> Result<Arc<JobConfig>, StrataError> {
        // 1. Fast path
        if let (Some(job), _) = self.lookup(job_id)? {
            return Ok(job);
        }

        // 2. Serialize loaders of this job, then re-check
        let guard = self.guard_for(job_id)?;
        let _loading = guard.lock().map_err(|_| poisoned("job"))?;
        let (cached, generation) = self.lookup(job_id)?;
        if let Some(job) = cached {
            debug!("Loaded by a concurrent caller");
            return Ok(job);
        }

        // 3. Load + initialize. Nothing is published on failure.
        let document = self.loader.load_job(job_id)?;
        let job = Arc::new(document.initialize(job_id, &self.resolver)?);

        let mut published = self.published.write().map_err(|_| poisoned("entries"))?;
        if published.generation == generation {
            published.jobs.insert(job_id.to_string(), Arc::clone(&job));
            info!(steps = job.len(), "Job config cached");
        } else {
            debug!("Cache reset during load, result not cached");
        }
        Ok(job)
    }

    /// Drops every cached job. The next request reloads; loads already
    /// running finish for their caller but are not cached.
    pub fn reset(&self) -> Result<(), StrataError> {
        let mut published = self.published.write().map_err(|_| poisoned("entries"))?;
        published.jobs.clear();
        published.generation += 1;
        debug!(generation = published.generation, "Config cache cleared");
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StrataError> {
        let published = self.published.read().map_err(|_| poisoned("entries"))?;
        Ok(published.jobs.len())
    }

    pub fn is_empty(&self) -> Result<bool, StrataError> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, job_id: &str) -> Result<bool, StrataError> {
        let published = self.published.read().map_err(|_| poisoned("entries"))?;
        Ok(published.jobs.contains_key(job_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::config::{FileToDbDefinition, JobDocument, StepDefinition};
    use crate::domain::error::DomainError;
    use crate::ports::SettingsSource;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    struct CountingLoader {
        calls: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self::with_delay(Duration::from_millis(20))
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl ConfigLoader for CountingLoader {
        fn load_job(&self, job_id: &str) -> Result<JobDocument, StrataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            // Widen the race window
            thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(DomainError::JobNotFound {
                    job_id: job_id.to_string(),
                }
                .into());
            }
            Ok(JobDocument::new(vec![(
                "load".to_string(),
                StepDefinition::FileToDb(FileToDbDefinition {
                    bean: Some("Person".into()),
                    file_name: Some("p.csv".into()),
                    input_file_base_path: None,
                }),
            )]))
        }
    }

    fn cache(loader: Arc<CountingLoader>) -> ConfigCache {
        let settings: Arc<dyn SettingsSource> = Arc::new(HashMap::from([(
            "inputFileBasePath".to_string(),
            "/data/in".to_string(),
        )]));
        ConfigCache::new(loader, Arc::new(PathResolver::new(settings)))
    }

    #[test]
    fn test_loads_once_under_concurrency() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache(Arc::clone(&loader));

        let jobs: Vec<Arc<JobConfig>> = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| cache.get_or_load("job1").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        for job in &jobs {
            assert!(Arc::ptr_eq(job, &jobs[0]));
        }
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_same_instance_on_repeat() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache(Arc::clone(&loader));

        let first = cache.get_or_load("job1").unwrap();
        let second = cache.get_or_load("job1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.step("load").unwrap().job_id(), "job1");
    }

    #[test]
    fn test_failed_load_is_retried() {
        let loader = Arc::new(CountingLoader::new());
        loader.fail.store(true, Ordering::SeqCst);
        let cache = cache(Arc::clone(&loader));

        assert!(cache.get_or_load("job1").is_err());
        assert!(!cache.contains("job1").unwrap());

        loader.fail.store(false, Ordering::SeqCst);
        assert!(cache.get_or_load("job1").is_ok());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_forces_reload() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache(Arc::clone(&loader));

        let before = cache.get_or_load("job1").unwrap();
        cache.reset().unwrap();
        assert!(cache.is_empty().unwrap());

        let after = cache.get_or_load("job1").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_during_load_does_not_overlap_or_keep_stale_entry() {
        let loader = Arc::new(CountingLoader::with_delay(Duration::from_millis(200)));
        let cache = cache(Arc::clone(&loader));

        let (first, second) = thread::scope(|s| {
            let first = s.spawn(|| cache.get_or_load("job1").unwrap());
            thread::sleep(Duration::from_millis(50));
            cache.reset().unwrap();
            let second = s.spawn(|| cache.get_or_load("job1").unwrap());
            (first.join().unwrap(), second.join().unwrap())
        });

        // The second caller waited for the first load, then loaded again
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(loader.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(!Arc::ptr_eq(&first, &second));

        // Only the post-reset load is cached
        let cached = cache.get_or_load("job1").unwrap();
        assert!(Arc::ptr_eq(&cached, &second));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache(Arc::clone(&loader));

        let _ = thread::scope(|s| {
            s.spawn(|| {
                let _held = cache.published.write().unwrap();
                panic!("poison the cache");
            })
            .join()
        });

        assert!(matches!(cache.len(), Err(StrataError::Internal(_))));
        assert!(matches!(cache.contains("job1"), Err(StrataError::Internal(_))));
        assert!(matches!(cache.get_or_load("job1"), Err(StrataError::Internal(_))));
    }

    #[test]
    fn test_process_wide_is_installed_once() {
        let loader = Arc::new(CountingLoader::new());
        let first = ConfigCache::process_wide(|| cache(Arc::clone(&loader)));
        let second = ConfigCache::process_wide(|| panic!("initialized twice"));
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_jobs_are_cached_independently() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache(Arc::clone(&loader));

        cache.get_or_load("job1").unwrap();
        cache.get_or_load("job2").unwrap();
        assert!(cache.contains("job1").unwrap() && cache.contains("job2").unwrap());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }
}
