//! # Orchestrator: the refresh loop.
//!
//! ```text
//! run_until(stop):
//!   subscriber_listener(done)      Bus ─► SubscriberSet
//!   start_monitor()                spawned once, never joined
//!   loop {
//!     source.acquire()
//!       ├─ Err ─► warn + AcquireFailed ─► yield ─► retry (no sleep, generation untouched)
//!       └─ Ok(list)
//!            ├─► generations.replace(list)
//!            ├─► sleep(refresh_interval)
//!            └─► emitter.emit(destination, label, client_id)   (result ignored)
//!   }
//!   stop cancelled (any await point):
//!     ShutdownRequested ─► retire current ─► root.cancel()
//!     ─► tracker.wait_idle(grace)      (counts spawned tasks, not events)
//!          ├─ idle      ─► AllStoppedWithin, Ok
//!          └─ timed out ─► GraceExceeded, Err(RuntimeError::GraceExceeded)
//!     ─► done.cancel() ─► listener forwards what is left ─► SubscriberSet::shutdown
//! ```
//!
//! Without a stop signal the loop never ends. A source that keeps failing
//! spins the loop without delay; the yield only keeps it cooperative.

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{Config, Generations, OrchestratorBuilder, WorkerTracker, shutdown};
use crate::descriptor::DescriptorSource;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::monitor::ContextMonitor;
use crate::subscribers::SubscriberSet;
use crate::usage::SnapshotEmitter;

/// Drives acquisition, generation replacement and snapshots.
pub struct Orchestrator {
    pub(crate) cfg: Config,
    pub(crate) bus: Bus,
    pub(crate) subs: Option<SubscriberSet>,
    pub(crate) tracker: Arc<WorkerTracker>,
    pub(crate) generations: Generations,
    pub(crate) source: Arc<dyn DescriptorSource>,
    pub(crate) emitter: Arc<dyn SnapshotEmitter>,
    pub(crate) monitor: Option<Arc<dyn ContextMonitor>>,
    pub(crate) root: CancellationToken,
}

impl Orchestrator {
    /// Starts building an orchestrator.
    pub fn builder(cfg: Config) -> OrchestratorBuilder {
        OrchestratorBuilder::new(cfg)
    }

    /// Event bus; receivers taken here observe every event published after the call.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Alive worker counts per generation.
    pub fn tracker(&self) -> &Arc<WorkerTracker> {
        &self.tracker
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runs until the process receives a termination signal.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let stop = CancellationToken::new();
        let trigger = stop.clone();
        tokio::spawn(async move {
            match shutdown::wait_for_shutdown_signal().await {
                Ok(()) => trigger.cancel(),
                Err(e) => warn!(error = %e, "signal handlers unavailable; running until killed"),
            }
        });
        self.run_until(stop).await
    }

    /// Runs until `stop` is cancelled.
    pub async fn run_until(mut self, stop: CancellationToken) -> Result<(), RuntimeError> {
        let done = CancellationToken::new();
        let listener = self.subscriber_listener(done.clone());
        self.start_monitor();
        info!(
            client_id = %self.cfg.client_id,
            snapshots = self.cfg.snapshots_enabled(),
            "refresh loop started"
        );

        loop {
            let acquired = tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                res = self.source.acquire() => res,
            };

            let list = match acquired {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "fetching job description");
                    self.bus
                        .publish(Event::new(EventKind::AcquireFailed).with_reason(e.to_string()));
                    tokio::task::yield_now().await;
                    continue;
                }
            };

            self.generations.replace(list);

            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = tokio::time::sleep(self.cfg.refresh_interval) => {}
            }

            self.emit_snapshot().await;
        }

        let res = self.shutdown().await;

        done.cancel();
        if let Some(listener) = listener {
            let _ = listener.await;
        }
        res
    }

    /// Forwards bus events to the subscriber set until `done`, then drains the
    /// bus and the subscriber queues.
    fn subscriber_listener(&mut self, done: CancellationToken) -> Option<JoinHandle<()>> {
        let set = self.subs.take()?;
        let mut rx = self.bus.subscribe();
        Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = done.cancelled() => break,
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(ev),
                        Err(RecvError::Lagged(n)) => {
                            debug!(skipped = n, "subscriber listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(ev),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        }))
    }

    fn start_monitor(&self) {
        if let Some(monitor) = self.monitor.clone() {
            tokio::spawn(async move { monitor.run().await });
        }
    }

    async fn emit_snapshot(&self) {
        let cfg = &self.cfg;
        let res = self
            .emitter
            .emit(&cfg.snapshot_destination, &cfg.snapshot_label, &cfg.client_id)
            .await;
        match res {
            Ok(()) => self.bus.publish(
                Event::new(EventKind::SnapshotEmitted)
                    .with_reason(cfg.snapshot_destination.as_str()),
            ),
            Err(e) => {
                debug!(error = %e, label = e.as_label(), "usage snapshot not published");
                self.bus
                    .publish(Event::new(EventKind::SnapshotFailed).with_reason(e.to_string()));
            }
        }
    }

    async fn shutdown(&mut self) -> Result<(), RuntimeError> {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.generations.retire();
        self.root.cancel();

        let Some(grace) = self.cfg.grace_period() else {
            return Ok(());
        };
        if self.tracker.wait_idle(grace).await {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            Ok(())
        } else {
            self.bus.publish(Event::new(EventKind::GraceExceeded));
            let stuck = self.tracker.snapshot();
            Err(RuntimeError::GraceExceeded { grace, stuck })
        }
    }
}
