//! # jobvisor
//!
//! **Jobvisor** keeps a fleet of async workers in line with a remotely
//! published job description.
//!
//! On every refresh cycle it acquires a job list, cancels the workers of the
//! previous generation and launches the new list's workers under a fresh
//! cancellation scope. Workers are fire-and-forget: the only way to stop one
//! is to cancel its generation.
//!
//! ## Architecture
//! ```text
//!        ┌──────────────────┐
//!        │ DescriptorSource │  (URLs / files, last-good cache, fallback)
//!        └────────┬─────────┘
//!                 ▼ JobList
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Orchestrator (refresh loop)                                 │
//! │  acquire ─► Generations::replace ─► sleep ─► SnapshotEmitter │
//! └───────┬──────────────────────────────────────────┬───────────┘
//!         ▼                                          │ once
//! ┌──────────────────────────────┐          ┌────────▼────────┐
//! │ Generations                  │          │ ContextMonitor  │
//! │ cancel N ─► start N+1        │          └─────────────────┘
//! │ fan_out: max(1, count) each  │
//! │ spawned via WorkerTracker    │  (exact alive counts, shutdown wait)
//! └───────┬──────────────┬───────┘
//!         ▼              ▼
//!     worker (job)   worker (job)   ... all share generation N+1's token
//!         │              │
//!         ▼              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Bus (broadcast channel)                     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//!                          SubscriberSet
//!                        ┌───────┴───────┐
//!                        ▼               ▼
//!                    LogWriter    user subscribers
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                          |
//! |-----------------|----------------------------------------------------------|---------------------------------------------|
//! | **Jobs**        | Worker constructors resolved by type name.               | [`Job`], [`JobFn`], [`JobRegistry`]         |
//! | **Descriptors** | Job description documents and where they come from.      | [`JobList`], [`DescriptorSource`]           |
//! | **Generations** | Cancel-then-launch replacement of the running workers.   | [`Generations`], [`Generation`]             |
//! | **Usage**       | Counters written by jobs, emitted once per cycle.        | [`UsageMeter`], [`SnapshotEmitter`]         |
//! | **Workers**     | Alive counts per generation, graceful shutdown.          | [`WorkerTracker`], [`Orchestrator`]         |
//! | **Events**      | Lifecycle events and subscribers.                        | [`Event`], [`Subscribe`], [`LogWriter`]     |
//! | **Errors**      | Typed errors; none of them stops the refresh loop.       | [`JobError`], [`RuntimeError`]              |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use jobvisor::{Config, JobArgs, JobError, JobFn, JobList, JobRegistry, Orchestrator, StaticSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.refresh_interval = Duration::from_millis(50);
//!
//!     let hello = JobFn::arc("hello", |ctx: CancellationToken, _args: JobArgs| async move {
//!         ctx.cancelled().await;
//!         Err::<(), JobError>(JobError::Canceled)
//!     });
//!     let list = JobList::from_slice(br#"{"jobs":[{"type":"hello","count":2}]}"#)?;
//!
//!     let orchestrator = Orchestrator::builder(cfg)
//!         .with_registry(JobRegistry::new().with(hello))
//!         .with_source(Arc::new(StaticSource::new(list)))
//!         .build()?;
//!
//!     let stop = CancellationToken::new();
//!     let trigger = stop.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(120)).await;
//!         trigger.cancel();
//!     });
//!     orchestrator.run_until(stop).await?;
//!     Ok(())
//! }
//! ```

mod core;
mod descriptor;
mod error;
mod events;
mod jobs;
mod monitor;
mod subscribers;
mod usage;

// ---- Public re-exports ----

pub use core::{
    Config, DispatchReport, Generation, Generations, Orchestrator, OrchestratorBuilder,
    WorkerTracker,
};
pub use descriptor::{
    DEFAULT_DOCUMENT, DescriptorSource, JobDescriptor, JobList, LocationSource, StaticSource,
};
pub use error::{AcquireError, EmitError, JobError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use jobs::{BoxJobFuture, Job, JobArgs, JobFn, JobRef, JobRegistry, builtin};
pub use monitor::{ContextMonitor, HttpContextMonitor, NetworkContext};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use usage::{MeterEmitter, SnapshotEmitter, UsageMeter, UsageSnapshot};
