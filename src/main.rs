//! Inventory gateway server (server-resident mode).
//!
//! ```text
//!     Client ──▶ /api/*              ──▶ proxy ─────────▶ upstream inventory API
//!            ──▶ /api/telegram/send  ──▶ notify ────────▶ messaging provider
//!            ──▶ /healthz
//!
//!     config (TOML + env) → logging → metrics → listener → serve until SIGINT/SIGTERM
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use inventory_gateway::config::loader;
use inventory_gateway::observability::{logging, metrics};
use inventory_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "inventory-gateway")]
#[command(about = "Reverse proxy and notification gateway for the inventory API", long_about = None)]
struct Args {
    /// TOML configuration file; defaults plus environment when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = loader::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "inventory-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        cors_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let signals = shutdown.trigger_on_signal();

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
