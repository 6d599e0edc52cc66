//! # Generation controller.
//!
//! A generation is one [`CancellationToken`] plus whatever workers were
//! launched under it. [`Generations`] owns the only reference to the current
//! one and is driven sequentially by the refresh loop, so `replace` takes
//! `&mut self` and needs no lock.
//!
//! ```text
//! replace(list)
//!   ├─► current.take() ─► token.cancel()        (signal only, no join)
//!   │                     publish GenerationCancelled
//!   ├─► new Generation { id + 1, root.child_token() }
//!   │   publish GenerationStarted
//!   ├─► dispatch::fan_out(new, list)
//!   └─► current = new
//! ```
//!
//! ## Invariants
//! - At most one generation is current.
//! - A generation is never dropped without its token being cancelled first.
//! - Cancellation of generation N happens before any worker of N+1 is launched;
//!   N's workers may still be running when N+1's start.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::dispatch::{self, DispatchReport};
use crate::core::tracker::WorkerTracker;
use crate::descriptor::JobList;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::JobRegistry;

/// One cancellation scope. Ids start at 1 and increase by one per `replace`.
#[derive(Debug, Clone)]
pub struct Generation {
    id: u64,
    token: CancellationToken,
}

impl Generation {
    pub(crate) fn new(id: u64, token: CancellationToken) -> Self {
        Self { id, token }
    }

    /// Generation id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token shared by every worker of this generation.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owner of the current generation.
pub struct Generations {
    registry: Arc<JobRegistry>,
    bus: Bus,
    root: CancellationToken,
    workers: Arc<WorkerTracker>,
    current: Option<Generation>,
    last_id: u64,
}

impl Generations {
    /// Creates a controller with no current generation.
    ///
    /// Every generation token is a child of `root`, so cancelling `root`
    /// stops all generations at once. Workers are spawned through `workers`.
    pub fn new(
        registry: Arc<JobRegistry>,
        bus: Bus,
        root: CancellationToken,
        workers: Arc<WorkerTracker>,
    ) -> Self {
        Self {
            registry,
            bus,
            root,
            workers,
            current: None,
            last_id: 0,
        }
    }

    /// Retires the current generation and launches `list` under a new one.
    pub fn replace(&mut self, list: JobList) -> DispatchReport {
        self.retire();

        self.last_id += 1;
        let next = Generation::new(self.last_id, self.root.child_token());
        self.bus.publish(
            Event::new(EventKind::GenerationStarted)
                .with_generation(next.id())
                .with_count(list.len()),
        );

        let report = dispatch::fan_out(&next, &list, &self.registry, &self.bus, &self.workers);
        debug!(
            generation = next.id(),
            launched = report.launched,
            skipped = report.skipped.len(),
            "generation dispatched"
        );
        self.current = Some(next);
        report
    }

    /// Requests cancellation of the current generation, if any. Does not wait.
    ///
    /// Returns the id of the retired generation.
    pub fn retire(&mut self) -> Option<u64> {
        let prev = self.current.take()?;
        prev.token.cancel();
        self.bus
            .publish(Event::new(EventKind::GenerationCancelled).with_generation(prev.id));
        Some(prev.id)
    }

    /// Alive worker accounting shared with the orchestrator.
    pub fn workers(&self) -> &Arc<WorkerTracker> {
        &self.workers
    }

    /// The current generation.
    pub fn current(&self) -> Option<&Generation> {
        self.current.as_ref()
    }
}
