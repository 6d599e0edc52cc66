//! # Live worker accounting.
//!
//! Every worker is spawned through [`WorkerTracker::spawn`], which counts it
//! before the task exists and uncounts it when the task's future is dropped
//! (completion, panic or runtime teardown). Nothing here depends on the event
//! bus, so the counts are exact at any point the refresh loop looks at them.
//!
//! ```text
//! runner::launch ──► tracker.spawn(generation, fut)
//!                      ├─► per_generation[generation] += 1   (synchronous)
//!                      └─► tasks.spawn(fut + AliveGuard)
//!                                              └─ drop ─► per_generation[generation] -= 1
//!
//! shutdown ──► tracker.wait_idle(grace) ──► tasks.close() + tasks.wait()
//!                  └─ timed out ─► tracker.snapshot() = stuck generations
//! ```
//!
//! No join handle is kept per worker; the [`TaskTracker`] only counts tasks.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::task::TaskTracker;

type Counts = Arc<Mutex<BTreeMap<u64, usize>>>;

/// Counts alive workers per generation and waits for them on shutdown.
#[derive(Debug, Default)]
pub struct WorkerTracker {
    tasks: TaskTracker,
    per_generation: Counts,
}

impl WorkerTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `fut` as a worker of `generation`.
    pub(crate) fn spawn<F>(&self, generation: u64, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        *lock(&self.per_generation).entry(generation).or_insert(0) += 1;
        let guard = AliveGuard {
            counts: Arc::clone(&self.per_generation),
            generation,
        };
        self.tasks.spawn(async move {
            let _guard = guard;
            fut.await;
        });
    }

    /// Total alive workers across generations.
    pub fn alive(&self) -> usize {
        lock(&self.per_generation).values().sum()
    }

    /// `(generation, alive)` pairs, oldest generation first.
    pub fn snapshot(&self) -> Vec<(u64, usize)> {
        lock(&self.per_generation)
            .iter()
            .map(|(g, n)| (*g, *n))
            .collect()
    }

    /// Waits until every spawned worker has exited. Returns false if `grace`
    /// elapsed first.
    ///
    /// Closes the underlying task tracker; workers spawned afterwards are
    /// still counted and waited for.
    pub async fn wait_idle(&self, grace: Duration) -> bool {
        self.tasks.close();
        tokio::time::timeout(grace, self.tasks.wait()).await.is_ok()
    }
}

fn lock(counts: &Mutex<BTreeMap<u64, usize>>) -> MutexGuard<'_, BTreeMap<u64, usize>> {
    counts.lock().unwrap_or_else(|p| p.into_inner())
}

struct AliveGuard {
    counts: Counts,
    generation: u64,
}

impl Drop for AliveGuard {
    fn drop(&mut self) {
        let mut map = lock(&self.counts);
        if let Some(n) = map.get_mut(&self.generation) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                map.remove(&self.generation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn counted_before_the_task_runs() {
        let t = WorkerTracker::new();
        let token = CancellationToken::new();
        for generation in [1, 1, 2] {
            let token = token.clone();
            t.spawn(generation, async move { token.cancelled().await });
        }
        // No yield yet: the tasks have not been polled.
        assert_eq!(t.alive(), 3);
        assert_eq!(t.snapshot(), vec![(1, 2), (2, 1)]);

        token.cancel();
        assert!(t.wait_idle(Duration::from_secs(5)).await);
        assert_eq!(t.alive(), 0);
        assert!(t.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_idle_reports_stuck_workers() {
        let t = WorkerTracker::new();
        t.spawn(4, std::future::pending::<()>());
        t.spawn(5, async {});

        assert!(!t.wait_idle(Duration::from_secs(1)).await);
        assert_eq!(t.snapshot(), vec![(4, 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn exact_for_generations_larger_than_any_queue() {
        let t = WorkerTracker::new();
        for _ in 0..5000 {
            t.spawn(1, std::future::pending::<()>());
        }
        assert!(!t.wait_idle(Duration::from_secs(1)).await);
        assert_eq!(t.snapshot(), vec![(1, 5000)]);
    }

    #[tokio::test]
    async fn panicking_worker_is_uncounted() {
        let t = WorkerTracker::new();
        let blow_up = true;
        t.spawn(1, async move {
            if blow_up {
                panic!("worker blew up");
            }
        });
        assert!(t.wait_idle(Duration::from_secs(5)).await);
        assert_eq!(t.alive(), 0);
    }

    #[tokio::test]
    async fn idle_when_nothing_was_spawned() {
        let t = WorkerTracker::new();
        assert!(t.wait_idle(Duration::ZERO).await);
        assert!(t.snapshot().is_empty());
    }
}
