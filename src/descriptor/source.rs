//! # Descriptor sources.
//!
//! [`DescriptorSource`] is called once per refresh attempt by the orchestrator.
//! An `Err` makes the loop retry immediately without touching the running
//! generation.
//!
//! ## LocationSource resolution order
//! ```text
//! acquire()
//!   ├─► location[0] ── fetch + parse ok ──► remember, return
//!   ├─► location[1] ── ...
//!   ├─► last remembered list (all locations failed)
//!   ├─► fallback document
//!   └─► Err(Exhausted)
//! ```
//! A location is an `http://` / `https://` URL or a local file path.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::descriptor::JobList;
use crate::error::AcquireError;

/// Job list used when no location is reachable and nothing was fetched before.
pub const DEFAULT_DOCUMENT: &str = r#"{"jobs":[{"type":"idle","count":1}]}"#;

/// Produces a [`JobList`] on demand.
#[async_trait]
pub trait DescriptorSource: Send + Sync + 'static {
    /// Acquires the current job list.
    async fn acquire(&self) -> Result<JobList, AcquireError>;
}

/// True for `http://` and `https://` locations.
pub(crate) fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Source that always yields the same list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    list: JobList,
}

impl StaticSource {
    /// Wraps a list.
    pub fn new(list: JobList) -> Self {
        Self { list }
    }
}

#[async_trait]
impl DescriptorSource for StaticSource {
    async fn acquire(&self) -> Result<JobList, AcquireError> {
        Ok(self.list.clone())
    }
}

/// Source reading an ordered list of URLs / file paths with fallbacks.
pub struct LocationSource {
    locations: Vec<String>,
    fallback: Option<String>,
    http: reqwest::Client,
    last_good: Mutex<Option<JobList>>,
}

impl LocationSource {
    /// Creates a source over `locations` (tried in order) without a fallback document.
    pub fn new<I, S>(locations: I, http: reqwest::Client) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            fallback: None,
            http,
            last_good: Mutex::new(None),
        }
    }

    /// Splits a comma-separated location list, dropping blanks.
    ///
    /// ```
    /// use jobvisor::LocationSource;
    ///
    /// assert_eq!(
    ///     LocationSource::split_locations(" a.json, ,https://x/jobs.json "),
    ///     vec!["a.json".to_string(), "https://x/jobs.json".to_string()],
    /// );
    /// ```
    pub fn split_locations(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Returns a new source with a fallback document (empty string = none).
    pub fn with_fallback(mut self, document: impl Into<String>) -> Self {
        let document = document.into();
        self.fallback = (!document.trim().is_empty()).then_some(document);
        self
    }

    /// Configured locations, in order.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>, AcquireError> {
        let fetch_err = |error: String| AcquireError::Fetch {
            location: location.to_string(),
            error,
        };

        if is_remote(location) {
            let resp = self
                .http
                .get(location)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| fetch_err(e.to_string()))?;
            let body = resp.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
            Ok(body.to_vec())
        } else {
            tokio::fs::read(location)
                .await
                .map_err(|e| fetch_err(e.to_string()))
        }
    }

    async fn load(&self, location: &str) -> Result<JobList, AcquireError> {
        let body = self.fetch(location).await?;
        JobList::from_slice(&body).map_err(|e| AcquireError::Parse {
            origin: location.to_string(),
            error: e.to_string(),
        })
    }
}

#[async_trait]
impl DescriptorSource for LocationSource {
    async fn acquire(&self) -> Result<JobList, AcquireError> {
        for location in &self.locations {
            match self.load(location).await {
                Ok(list) => {
                    *self.last_good.lock().await = Some(list.clone());
                    return Ok(list);
                }
                Err(e) => debug!(location = %location, error = %e, "descriptor location failed"),
            }
        }

        if let Some(list) = self.last_good.lock().await.clone() {
            if !self.locations.is_empty() {
                warn!("all descriptor locations failed; reusing last fetched job list");
            }
            return Ok(list);
        }

        match &self.fallback {
            Some(doc) => {
                if !self.locations.is_empty() {
                    warn!("all descriptor locations failed; using fallback document");
                }
                JobList::from_slice(doc.as_bytes()).map_err(|e| AcquireError::Parse {
                    origin: "fallback".to_string(),
                    error: e.to_string(),
                })
            }
            None => Err(AcquireError::Exhausted {
                tried: self.locations.len(),
            }),
        }
    }
}
