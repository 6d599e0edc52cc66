//! # Runtime events emitted by the orchestration loop and its workers.
//!
//! [`EventKind`] groups events into:
//! - **Refresh events**: acquisition failures, generation start/cancel, snapshots
//! - **Dispatch events**: worker launch, unknown job types
//! - **Worker events**: worker exit (stopped or failed)
//! - **Shutdown events**: shutdown request and grace outcome
//! - **Subscriber events**: overflow and panic in subscriber workers
//!
//! Each event carries a global sequence number (`seq`) that increases
//! monotonically, so observers can restore publish order.
//!
//! ## Example
//! ```rust
//! use jobvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerLaunched)
//!     .with_generation(3)
//!     .with_job("log")
//!     .with_replica(0);
//!
//! assert_eq!(ev.kind, EventKind::WorkerLaunched);
//! assert_eq!(ev.job.as_deref(), Some("log"));
//! assert_eq!(ev.generation, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Refresh events ===
    /// The descriptor source failed; the loop retries immediately.
    ///
    /// Sets: `reason`.
    AcquireFailed,

    /// A new generation became current.
    ///
    /// Sets: `generation`, `count` (descriptors in the job list).
    GenerationStarted,

    /// Cancellation of a superseded (or final) generation was requested.
    ///
    /// Sets: `generation`.
    GenerationCancelled,

    /// A usage snapshot was published.
    ///
    /// Sets: `reason` (destination).
    SnapshotEmitted,

    /// Publishing a usage snapshot failed (ignored by the loop).
    ///
    /// Sets: `reason`.
    SnapshotFailed,

    // === Dispatch events ===
    /// A descriptor named a job type the registry does not know.
    ///
    /// Sets: `generation`, `job`.
    JobUnknown,

    /// A worker replica was spawned.
    ///
    /// Sets: `generation`, `job`, `replica`.
    WorkerLaunched,

    // === Worker events ===
    /// A worker returned on its own or after observing cancellation.
    ///
    /// Sets: `generation`, `job`, `replica`.
    WorkerStopped,

    /// A worker returned an error.
    ///
    /// Sets: `generation`, `job`, `replica`, `reason`.
    WorkerFailed,

    // === Shutdown events ===
    /// Shutdown requested (OS signal or caller token).
    ShutdownRequested,

    /// All tracked workers exited within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some workers were still alive.
    GraceExceeded,

    // === Subscriber events ===
    /// A subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `job` (subscriber name), `reason`.
    SubscriberOverflow,

    /// A subscriber panicked while handling an event.
    ///
    /// Sets: `job` (subscriber name), `reason`.
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Generation id, if applicable.
    pub generation: Option<u64>,
    /// Job type (or subscriber name for subscriber events).
    pub job: Option<Arc<str>>,
    /// Replica index within a descriptor (0-based).
    pub replica: Option<u32>,
    /// Number of descriptors in a generation's job list.
    pub count: Option<u32>,
    /// Human-readable reason (errors, destinations, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            generation: None,
            job: None,
            replica: None,
            count: None,
            reason: None,
        }
    }

    /// Attaches a generation id.
    #[inline]
    pub fn with_generation(mut self, id: u64) -> Self {
        self.generation = Some(id);
        self
    }

    /// Attaches a job type name.
    #[inline]
    pub fn with_job(mut self, job: impl Into<Arc<str>>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Attaches a replica index.
    #[inline]
    pub fn with_replica(mut self, replica: u32) -> Self {
        self.replica = Some(replica);
        self
    }

    /// Attaches a descriptor count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(u32::try_from(count).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_job(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_job(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_increases_across_events() {
        let a = Event::new(EventKind::GenerationStarted);
        let b = Event::new(EventKind::GenerationCancelled);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn count_saturates() {
        let ev = Event::new(EventKind::GenerationStarted).with_count(usize::MAX);
        assert_eq!(ev.count, Some(u32::MAX));
    }
}
