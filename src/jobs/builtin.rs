//! Built-in jobs.
//!
//! | name    | args                                   | behavior                                   |
//! |---------|----------------------------------------|--------------------------------------------|
//! | `idle`  | none                                   | waits for cancellation                     |
//! | `log`   | `message`, `interval_ms` (1000)        | logs a line per tick, counts into `log`    |
//! | `timer` | `duration_ms` (1000)                   | completes on its own after `duration_ms`   |

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::jobs::{JobArgs, JobFn, JobRef, JobRegistry};
use crate::usage::UsageMeter;

/// Usage counter incremented by the `log` job.
pub const LOG_COUNTER: &str = "log";

#[derive(Debug, Deserialize)]
struct LogArgs {
    #[serde(default = "default_message")]
    message: String,
    #[serde(default = "default_interval_ms")]
    interval_ms: u64,
}

#[derive(Debug, Deserialize)]
struct TimerArgs {
    #[serde(default = "default_interval_ms")]
    duration_ms: u64,
}

fn default_message() -> String {
    "alive".to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

/// `idle`: holds a worker slot until its generation is cancelled.
pub fn idle() -> JobRef {
    JobFn::arc("idle", |ctx: CancellationToken, _args: JobArgs| run_idle(ctx))
}

/// `log`: periodic log line, one usage unit per line.
pub fn log(meter: Arc<UsageMeter>) -> JobRef {
    JobFn::arc("log", move |ctx: CancellationToken, args: JobArgs| {
        run_log(ctx, args, Arc::clone(&meter))
    })
}

/// `timer`: finishes after `duration_ms` unless cancelled first.
pub fn timer() -> JobRef {
    JobFn::arc("timer", |ctx: CancellationToken, args: JobArgs| run_timer(ctx, args))
}

async fn run_idle(ctx: CancellationToken) -> Result<(), JobError> {
    ctx.cancelled().await;
    Err(JobError::Canceled)
}

async fn run_log(
    ctx: CancellationToken,
    args: JobArgs,
    meter: Arc<UsageMeter>,
) -> Result<(), JobError> {
    let args: LogArgs = args.parse()?;
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    loop {
        tokio::select! {
            _ = ctx.cancelled() => return Err(JobError::Canceled),
            _ = ticker.tick() => {
                tracing::info!(message = %args.message, "tick");
                meter.add(LOG_COUNTER, 1);
            }
        }
    }
}

async fn run_timer(ctx: CancellationToken, args: JobArgs) -> Result<(), JobError> {
    let args: TimerArgs = args.parse()?;
    tokio::select! {
        _ = ctx.cancelled() => Err(JobError::Canceled),
        _ = tokio::time::sleep(Duration::from_millis(args.duration_ms)) => {
            tracing::debug!(duration_ms = args.duration_ms, "timer elapsed");
            Ok(())
        }
    }
}

impl JobRegistry {
    /// Registry pre-populated with `idle`, `log` and `timer`.
    pub fn with_builtins(meter: Arc<UsageMeter>) -> Self {
        JobRegistry::new().with(idle()).with(log(meter)).with(timer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn log_counts_ticks_until_cancelled() {
        let meter = Arc::new(UsageMeter::new());
        let job = log(Arc::clone(&meter));
        let token = CancellationToken::new();
        let args = JobArgs::new(json!({ "message": "hi", "interval_ms": 100 }));

        let handle = tokio::spawn(job.spawn(token.clone(), args));
        tokio::time::sleep(Duration::from_millis(250)).await;
        token.cancel();

        let res = handle.await.unwrap();
        assert!(matches!(res, Err(JobError::Canceled)));
        // ticks at 0, 100, 200
        assert_eq!(meter.get(LOG_COUNTER), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_completes_on_its_own() {
        let job = timer();
        let res = job
            .spawn(CancellationToken::new(), JobArgs::new(json!({ "duration_ms": 50 })))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn idle_stops_on_cancel() {
        let token = CancellationToken::new();
        token.cancel();
        let res = idle().spawn(token, JobArgs::default()).await;
        assert!(matches!(res, Err(JobError::Canceled)));
    }

    #[tokio::test]
    async fn log_rejects_bad_args() {
        let meter = Arc::new(UsageMeter::new());
        let res = log(meter)
            .spawn(CancellationToken::new(), JobArgs::new(json!({ "interval_ms": "soon" })))
            .await;
        assert!(matches!(res, Err(JobError::InvalidArgs { .. })));
    }

    #[test]
    fn builtins_registered() {
        let reg = JobRegistry::with_builtins(Arc::new(UsageMeter::new()));
        assert_eq!(reg.names(), vec!["idle", "log", "timer"]);
    }
}
