//! Web server for the Stellar Insights analytics dashboard

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use stellar_insights_core::{Config, init_logging};
use stellar_insights_web::{AppState, WebError, WebResult, build_app};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Command line interface for the dashboard server
#[derive(Debug, Parser)]
#[command(
    name = "stellar-insights-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "Analytics dashboard server for Stellar Insights"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host to bind to (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format
    #[arg(long, value_parser = ["json", "text"])]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> WebResult<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %config.source.dashboard_url(),
        "Starting Stellar Insights dashboard server"
    );

    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e: std::net::AddrParseError| WebError::InvalidAddress {
            address: config.server.host.clone(),
            reason: e.to_string(),
        })?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::new(&config)?;
    let state = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state.with_metrics(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            state
        }
    };
    let controller = state.controller.clone();
    controller.initialize()?;

    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard available at http://{}", addr);

    let served = axum::serve(listener, build_app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    controller.dispose();
    served?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
