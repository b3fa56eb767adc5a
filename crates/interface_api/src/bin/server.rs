//! Notify API Server Binary
//!
//! This binary starts the HTTP API server of the notify service.
//!
//! # Usage
//!
//! ```bash
//! # Run with a configuration file
//! NOTIFY_CONFIG=/etc/notify/config.yaml cargo run --bin notify-api
//!
//! # Override single values from the environment
//! NOTIFY_PORT=8080 NOTIFY_LOG_LEVEL=debug cargo run --bin notify-api
//! ```
//!
//! # Environment Variables
//!
//! * `NOTIFY_CONFIG` - Path of a yaml, json or toml configuration file
//! * `NOTIFY_HOST` - Server host (default: 0.0.0.0)
//! * `NOTIFY_PORT` - Server port (default: 5000)
//! * `NOTIFY_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `NOTIFY_MAX_CONCURRENCY` - Driver invocations in flight at once per request (default: 8)
//! * `NOTIFY_DRIVER_TIMEOUT_SECS` - Bound for one driver invocation (default: 60)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{config::ApiConfig, create_router, drivers::build_dispatcher};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Loads configuration, initializes logging, wires the dispatcher and starts
/// the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        backends = config.notify_backends.names().count(),
        "Starting notify API server"
    );

    let dispatcher = build_dispatcher(config.notify_backends.clone(), config.dispatch_options());
    let app = create_router(dispatcher);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
