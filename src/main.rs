//! EduNexus gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   UI action                         ┌──────────────────────────────┐
//!   ──────────▶ resilient client ────▶│   gateway forwarder          │────▶ remote origin
//!                │                    │   /api/proxy/{*path}         │
//!                │                    │   content-type-only headers  │
//!   ◀────────────┘◀───────────────────│   502 envelope on failure    │◀────
//!                                     └──────────────────────────────┘
//!
//!   login flow (one level above the client):
//!     bounded retry on 502/503 → local account fallback → session holder
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;

use edunexus_gateway::config;
use edunexus_gateway::lifecycle::shutdown::{on_ctrl_c, Shutdown};
use edunexus_gateway::observability;
use edunexus_gateway::GatewayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from);
    let config = config::load_or_default(config_path.as_deref())?;

    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(on_ctrl_c(shutdown));

    let server = GatewayServer::new(config)?;
    server.run(listener, signal).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
