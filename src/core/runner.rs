//! # Launch one worker replica.
//!
//! ```text
//! launch(job, generation, replica, args)
//!   ├─► job.spawn(token, args)          (inside the worker span)
//!   ├─► publish WorkerLaunched
//!   └─► workers.spawn ─► fut.await
//!                        ├─ Ok / Err(Canceled) ─► publish WorkerStopped
//!                        └─ Err(other)         ─► publish WorkerFailed
//! ```
//!
//! ## Rules
//! - No join handle is kept: the only way to stop a worker is its generation's token.
//! - The worker is counted by [`WorkerTracker`] before this function returns.
//! - The worker's "logger" is the `worker` span (`job`, `generation`, `replica`).
//! - `WorkerLaunched` is published before the task is spawned, so it always
//!   precedes the worker's exit event on the bus.

use std::sync::Arc;

use tracing::{Instrument, info_span};

use crate::core::generation::Generation;
use crate::core::tracker::WorkerTracker;
use crate::error::JobError;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{JobArgs, JobRef};

/// Spawns one replica of `job` bound to `generation`'s cancellation token.
pub(crate) fn launch(
    job: &JobRef,
    generation: &Generation,
    replica: usize,
    args: JobArgs,
    bus: &Bus,
    workers: &WorkerTracker,
) {
    let name: Arc<str> = Arc::from(job.name());
    let id = generation.id();
    let replica = u32::try_from(replica).unwrap_or(u32::MAX);

    let span = info_span!("worker", job = %name, generation = id, replica);
    let fut = span.in_scope(|| job.spawn(generation.token().clone(), args));

    bus.publish(
        Event::new(EventKind::WorkerLaunched)
            .with_generation(id)
            .with_job(Arc::clone(&name))
            .with_replica(replica),
    );

    let bus = bus.clone();
    workers.spawn(
        id,
        async move {
            let res = fut.await;
            publish_exit(&bus, id, name, replica, res);
        }
        .instrument(span),
    );
}

fn publish_exit(
    bus: &Bus,
    generation: u64,
    job: Arc<str>,
    replica: u32,
    res: Result<(), JobError>,
) {
    let ev = match res {
        Ok(()) | Err(JobError::Canceled) => Event::new(EventKind::WorkerStopped),
        Err(e) => Event::new(EventKind::WorkerFailed).with_reason(e.to_string()),
    };
    bus.publish(ev.with_generation(generation).with_job(job).with_replica(replica));
}
