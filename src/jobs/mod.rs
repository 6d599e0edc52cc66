//! # Jobs: runnable units of work and the registry that resolves them.
//!
//! - [`Job`] worker constructor (`spawn(ctx, args) -> BoxJobFuture`)
//! - [`JobFn`] closure-backed job
//! - [`JobRef`] shared handle (`Arc<dyn Job>`)
//! - [`JobArgs`] opaque descriptor payload
//! - [`JobRegistry`] name → job lookup
//! - [`builtin`] `idle`, `log`, `timer`

pub mod builtin;
mod job;
mod job_fn;
mod registry;

pub use job::{BoxJobFuture, Job, JobArgs, JobRef};
pub use job_fn::JobFn;
pub use registry::JobRegistry;
