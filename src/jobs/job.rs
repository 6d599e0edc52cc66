//! # Job abstraction.
//!
//! A [`Job`] is a runnable worker constructor: every call to [`Job::spawn`]
//! builds one fresh worker future bound to a generation's
//! [`CancellationToken`] and to the descriptor's [`JobArgs`].
//!
//! The shared handle type is [`JobRef`] (`Arc<dyn Job>`), which is what the
//! [`JobRegistry`](crate::JobRegistry) stores.
//!
//! ## Contract
//! - The returned future must resolve promptly once `ctx` is cancelled.
//! - Returning `Err(JobError::Canceled)` after cancellation is a clean stop.
//! - The core never inspects the result beyond logging it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// Boxed worker future produced by [`Job::spawn`].
pub type BoxJobFuture = Pin<Box<dyn Future<Output = Result<(), JobError>> + Send + 'static>>;

/// Shared handle to a job.
pub type JobRef = Arc<dyn Job>;

/// # Runnable worker constructor.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use jobvisor::{BoxJobFuture, Job, JobArgs, JobError};
///
/// struct Wait;
///
/// impl Job for Wait {
///     fn name(&self) -> &str { "wait" }
///
///     fn spawn(&self, ctx: CancellationToken, _args: JobArgs) -> BoxJobFuture {
///         Box::pin(async move {
///             ctx.cancelled().await;
///             Err(JobError::Canceled)
///         })
///     }
/// }
/// ```
pub trait Job: Send + Sync + 'static {
    /// Job type name, as referenced by descriptors.
    fn name(&self) -> &str;

    /// Creates one worker future.
    fn spawn(&self, ctx: CancellationToken, args: JobArgs) -> BoxJobFuture;
}

/// Opaque argument payload of a descriptor, shared read-only by all replicas.
#[derive(Clone, Debug, Default)]
pub struct JobArgs(Arc<Value>);

impl JobArgs {
    /// Wraps a JSON value.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Raw payload.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Decodes the payload into a job-specific type.
    ///
    /// A `null` payload decodes as an empty object so that argument structs
    /// made only of `#[serde(default)]` fields accept a missing `args`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, JobError> {
        let value = match self.0.as_ref() {
            Value::Null => Value::Object(Default::default()),
            v => v.clone(),
        };
        serde_json::from_value(value).map_err(|e| JobError::InvalidArgs {
            error: e.to_string(),
        })
    }
}

impl From<Value> for JobArgs {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Args {
        #[serde(default)]
        message: String,
    }

    #[test]
    fn null_args_parse_as_defaults() {
        let args = JobArgs::new(Value::Null);
        let parsed: Args = args.parse().unwrap();
        assert!(parsed.message.is_empty());
    }

    #[test]
    fn wrong_shape_is_invalid_args() {
        let args = JobArgs::new(json!({ "message": 7 }));
        let err = args.parse::<Args>().err().unwrap();
        assert_eq!(err.as_label(), "job_invalid_args");
    }
}
