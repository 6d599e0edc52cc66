use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::{Config, Generations, Orchestrator, WorkerTracker};
use crate::descriptor::{DescriptorSource, LocationSource};
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::jobs::JobRegistry;
use crate::monitor::{ContextMonitor, HttpContextMonitor};
use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};
use crate::usage::{MeterEmitter, SnapshotEmitter, UsageMeter};

/// Builder for an [`Orchestrator`].
///
/// Every collaborator has a default derived from [`Config`]:
/// - registry: [`JobRegistry::with_builtins`] over the builder's meter
/// - source: [`LocationSource`] over `locations` + `fallback`
/// - emitter: [`MeterEmitter`] over the builder's meter
/// - monitor: [`HttpContextMonitor`] when `monitor_url` is set
pub struct OrchestratorBuilder {
    cfg: Config,
    meter: Arc<UsageMeter>,
    registry: Option<JobRegistry>,
    source: Option<Arc<dyn DescriptorSource>>,
    emitter: Option<Arc<dyn SnapshotEmitter>>,
    monitor: Option<Arc<dyn ContextMonitor>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            meter: Arc::new(UsageMeter::new()),
            registry: None,
            source: None,
            emitter: None,
            monitor: None,
            subscribers: Vec::new(),
        }
    }

    /// Shares an existing usage meter with the default jobs and emitter.
    pub fn with_meter(mut self, meter: Arc<UsageMeter>) -> Self {
        self.meter = meter;
        self
    }

    /// Replaces the default job registry.
    pub fn with_registry(mut self, registry: JobRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the default descriptor source.
    pub fn with_source(mut self, source: Arc<dyn DescriptorSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replaces the default snapshot emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn SnapshotEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Sets the background context monitor.
    pub fn with_monitor(mut self, monitor: Arc<dyn ContextMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Adds event subscribers (in addition to the log writer).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subscribers);
        self
    }

    /// Builds the orchestrator. Must be called inside a Tokio runtime
    /// (subscriber workers are spawned here).
    pub fn build(self) -> Result<Orchestrator, RuntimeError> {
        let http = reqwest::Client::builder()
            .timeout(self.cfg.fetch_timeout)
            .build()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let tracker = Arc::new(WorkerTracker::new());

        let mut subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
        subscribers.extend(self.subscribers);
        let subs = SubscriberSet::new(subscribers, bus.clone());

        let registry = self
            .registry
            .unwrap_or_else(|| JobRegistry::with_builtins(Arc::clone(&self.meter)));

        let source = self.source.unwrap_or_else(|| {
            Arc::new(
                LocationSource::new(self.cfg.locations.clone(), http.clone())
                    .with_fallback(self.cfg.fallback.clone()),
            )
        });
        let emitter = self
            .emitter
            .unwrap_or_else(|| Arc::new(MeterEmitter::new(Arc::clone(&self.meter), http.clone())));
        let monitor = self.monitor.or_else(|| {
            self.cfg.monitor_url.clone().map(|url| {
                Arc::new(HttpContextMonitor::new(url, http.clone(), self.cfg.monitor_interval))
                    as Arc<dyn ContextMonitor>
            })
        });

        let root = CancellationToken::new();
        let generations = Generations::new(
            Arc::new(registry),
            bus.clone(),
            root.clone(),
            Arc::clone(&tracker),
        );

        Ok(Orchestrator {
            cfg: self.cfg,
            bus,
            subs: Some(subs),
            tracker,
            generations,
            source,
            emitter,
            monitor,
            root,
        })
    }
}
