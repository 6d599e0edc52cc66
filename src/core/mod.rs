//! Runtime core: the refresh loop and generation lifecycle.
//!
//! The public entry point is [`Orchestrator`], built through [`OrchestratorBuilder`].
//!
//! Internal modules:
//! - [`orchestrator`]: acquire, replace, sleep, snapshot; graceful shutdown;
//! - [`generation`]: owns the current generation and its cancellation token;
//! - [`dispatch`]: resolves descriptors and fans out replicas;
//! - [`runner`]: launches one worker and publishes its lifecycle events;
//! - [`tracker`]: counts alive workers per generation and waits for them;
//! - [`shutdown`]: cross-platform termination signals.

mod builder;
mod config;
mod dispatch;
mod generation;
mod orchestrator;
mod runner;
mod shutdown;
mod tracker;

pub use builder::OrchestratorBuilder;
pub use config::Config;
pub use dispatch::DispatchReport;
pub use generation::{Generation, Generations};
pub use orchestrator::Orchestrator;
pub use tracker::WorkerTracker;
