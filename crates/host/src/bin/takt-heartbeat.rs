//! takt-heartbeat: minimal host running a heartbeat cycle service.
//!
//! Logs one beat per cadence step until SIGINT/SIGTERM. Mostly useful as a
//! wiring reference: config loading, registry bindings, lifecycle, runner.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use takt_cycle::{CycleError, CycleService};
use takt_host::{HostConfig, HostLifecycle, HostRunner, ServiceRegistry};

// ── CLI ─────────────────────────────────────────────────────────────

/// Heartbeat host that emits a log line on a fixed cadence.
#[derive(Parser, Debug)]
#[command(name = "takt-heartbeat", version, about)]
struct Cli {
    /// Path to takt.toml config file.
    #[arg(long, env = "TAKT_CONFIG", default_value = "config/takt.toml")]
    config: String,

    /// Heartbeat cadence in milliseconds (overridden by config).
    #[arg(long, env = "TAKT_HEARTBEAT_CADENCE_MS", default_value_t = 1000)]
    cadence_ms: u64,
}

// ── Heartbeat service ───────────────────────────────────────────────

/// Capability exposed alongside the cycle service: how many beats so far.
trait Pulse: Send + Sync {
    fn beats(&self) -> u64;
}

struct Heartbeat {
    cadence: Duration,
    beats: AtomicU64,
}

impl Heartbeat {
    fn new(cadence: Duration) -> Self {
        Self {
            cadence,
            beats: AtomicU64::new(0),
        }
    }
}

impl Pulse for Heartbeat {
    fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CycleService for Heartbeat {
    fn cadence(&self) -> Duration {
        self.cadence
    }

    async fn execute_cycle(&self, _shutdown: &CancellationToken) -> Result<(), CycleError> {
        let beat = self.beats.fetch_add(1, Ordering::Relaxed) + 1;
        info!(beat, "heartbeat");
        Ok(())
    }

    fn name(&self) -> &str {
        "heartbeat"
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match HostConfig::from_file(&cli.config) {
        Ok(cfg) => {
            info!(path = %cli.config, "loaded host config");
            cfg
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %cli.config,
                "failed to load config, using local defaults"
            );
            HostConfig::local()
        }
    };

    let cadence = config.cadence_for("heartbeat", Duration::from_millis(cli.cadence_ms));

    let mut registry = ServiceRegistry::new();
    let heartbeat = registry.register(Heartbeat::new(cadence));
    registry.bind::<dyn Pulse>(heartbeat.clone());
    registry.add_cycle_service(heartbeat);

    let pulse = registry
        .get::<dyn Pulse>()
        .expect("pulse capability was just bound");

    let lifecycle = Arc::new(HostLifecycle::new());

    info!(cadence = ?cadence, "takt-heartbeat starting");
    let exit_code = HostRunner::new(registry, lifecycle, &config).run().await?;
    info!(beats = pulse.beats(), exit_code, "takt-heartbeat exited cleanly");

    std::process::exit(exit_code);
}
