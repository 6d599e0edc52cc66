//! # Job registry: job type name → worker constructor.
//!
//! Built once at startup and shared read-only (`Arc<JobRegistry>`) with the
//! orchestrator. Registration is by [`Job::name`]; registering a second job with
//! the same name replaces the first.

use std::collections::HashMap;

use crate::jobs::job::{Job, JobRef};

/// Lookup table of runnable jobs.
#[derive(Default, Clone)]
pub struct JobRegistry {
    jobs: HashMap<String, JobRef>,
}

impl JobRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job under its own name. Returns the job it replaced, if any.
    pub fn register(&mut self, job: JobRef) -> Option<JobRef> {
        self.jobs.insert(job.name().to_string(), job)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, job: JobRef) -> Self {
        self.register(job);
        self
    }

    /// Resolves a job type name.
    pub fn lookup(&self, name: &str) -> Option<JobRef> {
        self.jobs.get(name).cloned()
    }

    /// Returns sorted list of registered names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.jobs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("jobs", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JobArgs, JobError, JobFn};
    use tokio_util::sync::CancellationToken;

    fn noop(name: &'static str) -> JobRef {
        JobFn::arc(name, |_ctx: CancellationToken, _args: JobArgs| async {
            Ok::<(), JobError>(())
        })
    }

    #[test]
    fn lookup_hit_and_miss() {
        let reg = JobRegistry::new().with(noop("a"));
        assert!(reg.lookup("a").is_some());
        assert!(reg.lookup("b").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut reg = JobRegistry::new();
        assert!(reg.register(noop("a")).is_none());
        assert!(reg.register(noop("a")).is_some());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let reg = JobRegistry::new().with(noop("b")).with(noop("a"));
        assert_eq!(reg.names(), vec!["a", "b"]);
    }
}
