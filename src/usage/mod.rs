//! Usage accounting: counters written by jobs and the per-cycle snapshot emitter.

mod meter;
mod snapshot;

pub use meter::UsageMeter;
pub use snapshot::{MeterEmitter, SnapshotEmitter, UsageSnapshot};
