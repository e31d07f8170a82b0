//! Pizza service telemetry host.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ ┌──────────────┐ ──▶ handlers
//!               │ observe hook │
//!   response ◀─ └──────┬───────┘ ◀──
//!                      │ count / latency / http log
//!                      ▼
//!   ┌────────────┐  ┌────────────┐       ┌───────────────┐
//!   │ LogEmitter │  │ Aggregator │ ◀──── │ FlushScheduler│ (60s, off in test mode)
//!   └─────┬──────┘  └─────┬──────┘       └───────┬───────┘
//!         │               │ MetricPusher         │
//!         ▼               ▼                      ▼
//!   ┌──────────────────────────────────────────────────┐
//!   │ per-target queues → PushWorkers → PushClient     │ ──▶ log backend
//!   └──────────────────────────────────────────────────┘ ──▶ metrics backend
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pizza_telemetry::config::{load_config, TelemetryConfig};
use pizza_telemetry::http::{demo_routes, HttpServer};
use pizza_telemetry::lifecycle::{start_pipeline, trigger_on_ctrl_c, Shutdown};
use pizza_telemetry::logger::install_panic_hook;
use pizza_telemetry::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "pizza-telemetry")]
#[command(about = "Pizza service host with an embedded telemetry pipeline", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "PIZZA_TELEMETRY_CONFIG")]
    config: Option<PathBuf>,

    /// Disable the flush scheduler and quiet log-push rejections.
    #[arg(long, env = "PIZZA_TELEMETRY_TEST_MODE")]
    test_mode: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TelemetryConfig::default(),
    };
    config.test_mode |= cli.test_mode;

    logging::init_tracing(&config.observability);
    tracing::info!("pizza-telemetry v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let pipeline = start_pipeline(&config, &shutdown)?;
    install_panic_hook(pipeline.telemetry.logger.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tokio::spawn(trigger_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(demo_routes(), pipeline.telemetry.clone());
    server.run(listener, shutdown.clone()).await?;

    shutdown.trigger();
    pipeline.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
