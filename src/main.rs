use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobvisor::{Config, DEFAULT_DOCUMENT, JobRegistry, LocationSource, Orchestrator, UsageMeter};

#[derive(Parser, Debug)]
#[command(name = "jobvisor")]
#[command(version)]
#[command(about = "Keeps a worker population in sync with a periodically refreshed job description")]
struct Args {
    /// Job description locations (comma-separated, each a URL or a file path)
    #[arg(short = 'c', long = "config", env = "JOBVISOR_CONFIG", default_value = "")]
    config: String,

    /// Raw backup job description used when no location is available
    #[arg(short = 'b', long = "backup-config", default_value = DEFAULT_DOCUMENT)]
    backup_config: String,

    /// Seconds to wait between job description refreshes
    #[arg(short = 'r', long = "refresh", default_value_t = 60)]
    refresh_secs: u64,

    /// Log level (overridden by RUST_LOG)
    #[arg(short = 'l', long = "log-level", default_value = "info")]
    log_level: String,

    /// Where to dump usage snapshots (URL or file); empty disables them
    #[arg(short = 'm', long = "metrics", default_value = "")]
    metrics: String,

    /// Network context endpoint polled in the background
    #[arg(long)]
    monitor_url: Option<String>,

    /// Client id reported in usage snapshots (random if omitted)
    #[arg(long)]
    client_id: Option<String>,

    /// Seconds to wait for workers on shutdown (0 = don't wait)
    #[arg(long, default_value_t = 10)]
    grace: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut cfg = Config {
        locations: LocationSource::split_locations(&args.config),
        fallback: args.backup_config,
        refresh_interval: Duration::from_secs(args.refresh_secs),
        snapshot_destination: args.metrics,
        monitor_url: args.monitor_url,
        grace: Duration::from_secs(args.grace),
        ..Config::default()
    };
    if let Some(id) = args.client_id {
        cfg.client_id = id;
    }

    info!(client_id = %cfg.client_id, "started client");

    let meter = Arc::new(UsageMeter::new());
    let orchestrator = Orchestrator::builder(cfg)
        .with_meter(Arc::clone(&meter))
        .with_registry(JobRegistry::with_builtins(meter))
        .build()?;

    orchestrator.run().await?;
    Ok(())
}
