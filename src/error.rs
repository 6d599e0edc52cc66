//! Error types used by the jobvisor runtime, its collaborators and jobs.
//!
//! - [`RuntimeError`] errors raised while building or shutting down the orchestrator.
//! - [`JobError`] errors returned by individual worker executions.
//! - [`AcquireError`] errors raised by a [`DescriptorSource`](crate::DescriptorSource).
//! - [`EmitError`] errors raised by a [`SnapshotEmitter`](crate::SnapshotEmitter).
//!
//! Every enum provides `as_label` (stable snake_case string for logs/metrics).
//! None of these errors is fatal to the refresh loop.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the jobvisor runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some workers were still alive.
    #[error("shutdown timeout {grace:?} exceeded; stuck generations: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// `(generation, alive workers)` pairs that did not stop in time.
        stuck: Vec<(u64, usize)>,
    },

    /// The shared HTTP client could not be constructed.
    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::HttpClient(_) => "runtime_http_client",
        }
    }
}

/// # Errors produced by a worker.
///
/// The core never acts on these: they are logged by the worker runner and
/// published as `WorkerFailed` events.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// Worker failed; the next generation may try again.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable error for this worker.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The descriptor arguments could not be decoded for this job.
    #[error("invalid arguments: {error}")]
    InvalidArgs {
        /// Decoder message.
        error: String,
    },

    /// Worker observed its generation's cancellation.
    #[error("generation cancelled")]
    Canceled,
}

impl JobError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::JobError;
    ///
    /// assert_eq!(JobError::Canceled.as_label(), "job_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Fail { .. } => "job_failed",
            JobError::Fatal { .. } => "job_fatal",
            JobError::InvalidArgs { .. } => "job_invalid_args",
            JobError::Canceled => "job_canceled",
        }
    }
}

/// # Errors produced while acquiring a job list.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AcquireError {
    /// A location could not be read.
    #[error("fetch {location}: {error}")]
    Fetch {
        /// The location that failed (URL or path).
        location: String,
        /// Transport or I/O message.
        error: String,
    },

    /// A document could not be decoded.
    #[error("parse {origin}: {error}")]
    Parse {
        /// Where the document came from (location or `fallback`).
        origin: String,
        /// Decoder message.
        error: String,
    },

    /// Every location failed and there is nothing to fall back on.
    #[error("no usable job description (tried {tried} locations)")]
    Exhausted {
        /// Number of locations attempted.
        tried: usize,
    },
}

impl AcquireError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AcquireError::Fetch { .. } => "acquire_fetch",
            AcquireError::Parse { .. } => "acquire_parse",
            AcquireError::Exhausted { .. } => "acquire_exhausted",
        }
    }
}

/// # Errors produced while publishing a usage snapshot.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitError {
    /// Writing the snapshot file failed.
    #[error("write snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Posting the snapshot failed.
    #[error("post snapshot: {0}")]
    Http(#[from] reqwest::Error),

    /// The snapshot could not be encoded.
    #[error("encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Io(_) => "emit_io",
            EmitError::Http(_) => "emit_http",
            EmitError::Encode(_) => "emit_encode",
        }
    }
}
