//! # Runtime configuration.
//!
//! [`Config`] holds the plain values the refresh loop consumes. The binary
//! fills it from command-line flags; embedding code sets fields directly.
//!
//! ## Sentinel values
//! - `snapshot_destination = ""` → snapshots disabled (emitter is still called, and no-ops)
//! - `grace = 0s` → do not wait for workers on shutdown
//! - `monitor_url = None` → no background context monitor
//! - `locations = []` → the fallback document is the only source

use std::time::Duration;

use crate::descriptor::DEFAULT_DOCUMENT;

/// Configuration for the orchestrator.
#[derive(Clone, Debug)]
pub struct Config {
    /// Descriptor locations (URLs or file paths), tried in order.
    pub locations: Vec<String>,
    /// Fallback job description document (JSON); empty = none.
    pub fallback: String,
    /// Sleep between a successful acquisition and the next cycle.
    pub refresh_interval: Duration,
    /// Where usage snapshots go (URL or file path); empty = disabled.
    pub snapshot_destination: String,
    /// Label attached to every snapshot.
    pub snapshot_label: String,
    /// Identity of this client, included in snapshots.
    pub client_id: String,
    /// Per-request timeout for HTTP locations, snapshot posts and monitor lookups.
    pub fetch_timeout: Duration,
    /// Maximum wait for workers to exit on shutdown.
    pub grace: Duration,
    /// Event bus ring buffer size (min 1).
    pub bus_capacity: usize,
    /// Network context endpoint polled by the background monitor.
    pub monitor_url: Option<String>,
    /// Interval between monitor lookups (`0s` = look up once).
    pub monitor_interval: Duration,
}

impl Config {
    /// True when snapshots have a destination.
    #[inline]
    pub fn snapshots_enabled(&self) -> bool {
        !self.snapshot_destination.is_empty()
    }

    /// Shutdown grace as an `Option` (`None` = don't wait).
    #[inline]
    pub fn grace_period(&self) -> Option<Duration> {
        (!self.grace.is_zero()).then_some(self.grace)
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// - `refresh_interval = 60s`
    /// - `fallback =` [`DEFAULT_DOCUMENT`] (one `idle` worker)
    /// - `snapshot_label = "traffic"`, no destination
    /// - `client_id` = fresh UUID v4
    /// - `fetch_timeout = 10s`, `grace = 10s`, `bus_capacity = 1024`
    /// - no monitor, `monitor_interval = 10min`
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            fallback: DEFAULT_DOCUMENT.to_string(),
            refresh_interval: Duration::from_secs(60),
            snapshot_destination: String::new(),
            snapshot_label: "traffic".to_string(),
            client_id: uuid::Uuid::new_v4().to_string(),
            fetch_timeout: Duration::from_secs(10),
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
            monitor_url: None,
            monitor_interval: Duration::from_secs(600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels() {
        let mut cfg = Config::default();
        assert!(!cfg.snapshots_enabled());
        assert_eq!(cfg.grace_period(), Some(Duration::from_secs(10)));

        cfg.grace = Duration::ZERO;
        cfg.bus_capacity = 0;
        cfg.snapshot_destination = "usage.json".into();
        assert!(cfg.snapshots_enabled());
        assert_eq!(cfg.grace_period(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn client_ids_are_unique() {
        assert_ne!(Config::default().client_id, Config::default().client_id);
    }
}
