//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(CancellationToken, JobArgs) -> Fut` and
//! calls it once per replica, so every worker owns its own future and state.
//! Shared state between replicas must be explicit (`Arc<...>` captured by the closure).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use jobvisor::{JobArgs, JobError, JobFn, JobRef};
//!
//! let j: JobRef = JobFn::arc("noop", |_ctx: CancellationToken, _args: JobArgs| async move {
//!     Ok::<(), JobError>(())
//! });
//!
//! assert_eq!(j.name(), "noop");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::jobs::job::{BoxJobFuture, Job, JobArgs};

/// Function-backed job implementation.
pub struct JobFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new function-backed job.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the job and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Job for JobFn<F>
where
    F: Fn(CancellationToken, JobArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, ctx: CancellationToken, args: JobArgs) -> BoxJobFuture {
        Box::pin((self.f)(ctx, args))
    }
}
