//! # Background network-context monitor.
//!
//! Started once by the orchestrator and never joined. It only logs: a lookup
//! failure or a changed context never affects the refresh loop.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

/// Side task started once alongside the refresh loop.
#[async_trait]
pub trait ContextMonitor: Send + Sync + 'static {
    /// Runs until done; the orchestrator never waits on it.
    async fn run(&self);
}

/// What the context endpoint reports about this host's network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NetworkContext {
    /// Country reported for the public address.
    #[serde(default, alias = "country_name")]
    pub country: Option<String>,
    /// Public address.
    #[serde(default)]
    pub ip: Option<String>,
}

/// Polls a JSON endpoint and logs the reported [`NetworkContext`] when it changes.
pub struct HttpContextMonitor {
    url: String,
    http: reqwest::Client,
    interval: Duration,
}

impl HttpContextMonitor {
    /// `interval = 0s` looks up once and returns.
    pub fn new(url: impl Into<String>, http: reqwest::Client, interval: Duration) -> Self {
        Self {
            url: url.into(),
            http,
            interval,
        }
    }

    /// Fetches the context once.
    pub async fn lookup(&self) -> Result<NetworkContext, reqwest::Error> {
        self.http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<NetworkContext>()
            .await
    }
}

#[async_trait]
impl ContextMonitor for HttpContextMonitor {
    async fn run(&self) {
        let mut last: Option<NetworkContext> = None;
        loop {
            match self.lookup().await {
                Ok(ctx) if last.as_ref() != Some(&ctx) => {
                    info!(
                        country = ctx.country.as_deref().unwrap_or("unknown"),
                        ip = ctx.ip.as_deref().unwrap_or("unknown"),
                        "network context"
                    );
                    last = Some(ctx);
                }
                Ok(_) => {}
                Err(e) => warn!(url = %self.url, error = %e, "network context lookup failed"),
            }

            if self.interval.is_zero() {
                return;
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
