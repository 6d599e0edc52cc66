//! # Dispatch fan-out: job list → worker replicas of one generation.
//!
//! ```text
//! for descriptor in list (in order):
//!   registry.lookup(type)
//!     ├─ None      ─► warn + JobUnknown, skip this descriptor only
//!     └─ Some(job) ─► launch max(1, count) replicas with the descriptor's args
//! ```
//!
//! Launching is fire-and-forget; the returned [`DispatchReport`] only counts
//! what was launched and names what was skipped.

use tracing::warn;

use crate::core::generation::Generation;
use crate::core::runner;
use crate::core::tracker::WorkerTracker;
use crate::descriptor::JobList;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{JobArgs, JobRegistry};

/// Outcome of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Worker replicas launched.
    pub launched: usize,
    /// Job types that were not found in the registry, in list order.
    pub skipped: Vec<String>,
}

/// Launches the workers of `list` under `generation`.
pub(crate) fn fan_out(
    generation: &Generation,
    list: &JobList,
    registry: &JobRegistry,
    bus: &Bus,
    workers: &WorkerTracker,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for desc in list {
        let Some(job) = registry.lookup(&desc.kind) else {
            warn!(job = %desc.kind, generation = generation.id(), "no such job");
            bus.publish(
                Event::new(EventKind::JobUnknown)
                    .with_generation(generation.id())
                    .with_job(desc.kind.as_str()),
            );
            report.skipped.push(desc.kind.clone());
            continue;
        };

        let args = JobArgs::new(desc.args.clone());
        for replica in 0..desc.replicas() {
            runner::launch(&job, generation, replica, args.clone(), bus, workers);
            report.launched += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::JobDescriptor;
    use crate::{JobError, JobFn};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    fn counting(name: &'static str, calls: Arc<AtomicUsize>) -> crate::JobRef {
        JobFn::arc(name, move |ctx: CancellationToken, _args: JobArgs| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                ctx.cancelled().await;
                Err::<(), JobError>(JobError::Canceled)
            }
        })
    }

    #[tokio::test]
    async fn launches_replicas_and_skips_unknown() {
        let a = Arc::new(AtomicUsize::new(0));
        let registry = JobRegistry::new().with(counting("A", a.clone()));
        let bus = Bus::new(64);
        let generation = Generation::new(1, CancellationToken::new());

        let list = JobList::new(vec![JobDescriptor::new("A", 3), JobDescriptor::new("B", 1)]);
        let report = fan_out(&generation, &list, &registry, &bus, &WorkerTracker::new());

        assert_eq!(report.launched, 3);
        assert_eq!(report.skipped, vec!["B".to_string()]);
        assert_eq!(a.load(Ordering::SeqCst), 3);
        generation.token().cancel();
    }

    #[tokio::test]
    async fn non_positive_count_launches_one() {
        let a = Arc::new(AtomicUsize::new(0));
        let registry = JobRegistry::new().with(counting("A", a.clone()));
        let bus = Bus::new(64);
        let generation = Generation::new(1, CancellationToken::new());

        let list = JobList::new(vec![JobDescriptor::new("A", 0), JobDescriptor::new("A", -5)]);
        let report = fan_out(&generation, &list, &registry, &bus, &WorkerTracker::new());

        assert_eq!(report.launched, 2);
        assert_eq!(a.load(Ordering::SeqCst), 2);
        generation.token().cancel();
    }

    #[tokio::test]
    async fn unknown_type_does_not_block_later_descriptors() {
        let a = Arc::new(AtomicUsize::new(0));
        let registry = JobRegistry::new().with(counting("A", a.clone()));
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let generation = Generation::new(7, CancellationToken::new());

        let list = JobList::new(vec![
            JobDescriptor::new("missing", 2),
            JobDescriptor::new("A", 2),
        ]);
        fan_out(&generation, &list, &registry, &bus, &WorkerTracker::new());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::JobUnknown);
        assert_eq!(first.job.as_deref(), Some("missing"));
        for replica in 0..2 {
            let ev = rx.recv().await.unwrap();
            assert_eq!(ev.kind, EventKind::WorkerLaunched);
            assert_eq!(ev.generation, Some(7));
            assert_eq!(ev.replica, Some(replica));
        }
        assert_eq!(a.load(Ordering::SeqCst), 2);
        generation.token().cancel();
    }

    #[tokio::test]
    async fn replicas_share_args_and_report_exit() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let job = {
            let seen = seen.clone();
            JobFn::arc("echo", move |_ctx: CancellationToken, args: JobArgs| {
                seen.lock().unwrap().push(args.value().clone());
                async { Ok::<(), JobError>(()) }
            })
        };
        let registry = JobRegistry::new().with(job);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let generation = Generation::new(1, CancellationToken::new());

        let list = JobList::new(vec![
            JobDescriptor::new("echo", 2).with_args(serde_json::json!({ "k": 1 })),
        ]);
        fan_out(&generation, &list, &registry, &bus, &WorkerTracker::new());

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert!(seen.lock().unwrap().iter().all(|v| v["k"] == 1));

        let mut stopped = 0;
        while stopped < 2 {
            let ev = rx.recv().await.unwrap();
            if ev.kind == EventKind::WorkerStopped {
                stopped += 1;
            }
        }
    }

    #[tokio::test]
    async fn launch_count_is_sum_of_normalized_counts() {
        // (descriptors, expected launches, expected skipped)
        let cases: Vec<(Vec<(&str, i64)>, usize, Vec<&str>)> = vec![
            (vec![], 0, vec![]),
            (vec![("A", 0)], 1, vec![]),
            (vec![("A", -1), ("B", i64::MIN)], 2, vec![]),
            (vec![("A", 1500), ("B", 3)], 1503, vec![]),
            (vec![("x", 9), ("A", 2), ("y", 0), ("B", -4), ("x", 1)], 3, vec!["x", "y", "x"]),
            (vec![("A", 5), ("nope", 5), ("A", 0), ("B", 7)], 13, vec!["nope"]),
            (vec![("x", 1), ("y", 1)], 0, vec!["x", "y"]),
        ];

        for (descriptors, launched, skipped) in cases {
            let a = Arc::new(AtomicUsize::new(0));
            let b = Arc::new(AtomicUsize::new(0));
            let registry = JobRegistry::new()
                .with(counting("A", a.clone()))
                .with(counting("B", b.clone()));
            let workers = WorkerTracker::new();
            let generation = Generation::new(1, CancellationToken::new());

            let list: JobList = descriptors
                .iter()
                .map(|(kind, count)| JobDescriptor::new(*kind, *count))
                .collect();
            let report = fan_out(&generation, &list, &registry, &Bus::new(16), &workers);

            assert_eq!(report.launched, launched, "{descriptors:?}");
            assert_eq!(report.skipped, skipped, "{descriptors:?}");
            assert_eq!(
                a.load(Ordering::SeqCst) + b.load(Ordering::SeqCst),
                launched,
                "{descriptors:?}"
            );
            assert_eq!(workers.alive(), launched, "{descriptors:?}");

            generation.token().cancel();
            assert!(workers.wait_idle(std::time::Duration::from_secs(5)).await);
        }
    }
}
