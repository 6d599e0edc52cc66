//! # Usage snapshots.
//!
//! [`SnapshotEmitter`] is the seam the refresh loop calls once per cycle,
//! after the refresh sleep. The loop awaits it but ignores the result beyond
//! logging, so a slow or failing destination never changes control flow.
//!
//! [`MeterEmitter`] is the default implementation. It serializes the
//! [`UsageMeter`] counters into a [`UsageSnapshot`] and:
//! - does nothing when `destination` is empty;
//! - POSTs the JSON when `destination` is an `http://` / `https://` URL;
//! - otherwise writes the JSON to `destination` as a file path.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::descriptor::is_remote;
use crate::error::EmitError;
use crate::usage::UsageMeter;

/// Publishes one usage snapshot.
#[async_trait]
pub trait SnapshotEmitter: Send + Sync + 'static {
    /// Publishes the snapshot identified by `label` for `client_id` to `destination`.
    async fn emit(&self, destination: &str, label: &str, client_id: &str) -> Result<(), EmitError>;
}

/// Serialized form of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Identity of the emitting client.
    pub client_id: String,
    /// Snapshot label (e.g. `traffic`).
    pub label: String,
    /// Unix timestamp, seconds.
    pub at: u64,
    /// Cumulative counters.
    pub counters: BTreeMap<String, u64>,
}

/// Default emitter backed by a [`UsageMeter`].
pub struct MeterEmitter {
    meter: Arc<UsageMeter>,
    http: reqwest::Client,
}

impl MeterEmitter {
    /// Creates an emitter reading `meter`; `http` is used for URL destinations.
    pub fn new(meter: Arc<UsageMeter>, http: reqwest::Client) -> Self {
        Self { meter, http }
    }

    /// Builds the snapshot without publishing it.
    pub fn snapshot(&self, label: &str, client_id: &str) -> UsageSnapshot {
        let at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        UsageSnapshot {
            client_id: client_id.to_string(),
            label: label.to_string(),
            at,
            counters: self.meter.snapshot(),
        }
    }
}

#[async_trait]
impl SnapshotEmitter for MeterEmitter {
    async fn emit(&self, destination: &str, label: &str, client_id: &str) -> Result<(), EmitError> {
        if destination.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot(label, client_id);

        if is_remote(destination) {
            self.http
                .post(destination)
                .json(&snapshot)
                .send()
                .await?
                .error_for_status()?;
        } else {
            let body = serde_json::to_vec_pretty(&snapshot)?;
            tokio::fs::write(destination, body).await?;
        }
        Ok(())
    }
}
