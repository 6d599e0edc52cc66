//! # LogWriter: renders runtime events through `tracing`.
//!
//! Warnings the refresh loop must always emit (acquisition failure, unknown
//! job type) are logged at their source; this subscriber only repeats them at
//! `debug`. Worker failures are logged here, since the core never looks at them.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let job = e.job.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::GenerationStarted => {
                info!(generation = ?e.generation, descriptors = ?e.count, "generation started");
            }
            EventKind::GenerationCancelled => {
                info!(generation = ?e.generation, "generation cancelled");
            }
            EventKind::WorkerLaunched => {
                debug!(generation = ?e.generation, job, replica = ?e.replica, "worker launched");
            }
            EventKind::WorkerStopped => {
                debug!(generation = ?e.generation, job, replica = ?e.replica, "worker stopped");
            }
            EventKind::WorkerFailed => {
                warn!(generation = ?e.generation, job, replica = ?e.replica, reason, "worker failed");
            }
            EventKind::AcquireFailed => debug!(reason, "acquire failed"),
            EventKind::JobUnknown => debug!(generation = ?e.generation, job, "unknown job"),
            EventKind::SnapshotEmitted => debug!(destination = reason, "snapshot emitted"),
            EventKind::SnapshotFailed => debug!(reason, "snapshot failed"),
            EventKind::ShutdownRequested => info!("shutdown requested"),
            EventKind::AllStoppedWithin => info!("all workers stopped within grace"),
            EventKind::GraceExceeded => warn!("grace exceeded"),
            EventKind::SubscriberOverflow => warn!(subscriber = job, reason, "subscriber overflow"),
            EventKind::SubscriberPanicked => error!(subscriber = job, reason, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
