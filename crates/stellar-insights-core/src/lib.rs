//! Core types and utilities for Stellar Insights
//!
//! Holds the dashboard snapshot model, the view-state enum, the display
//! rules applied to snapshot figures, configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod format;
pub mod types;

// Re-export commonly used types
pub use config::{Config, LoggingConfig, ServerConfig, SourceConfig};
pub use error::{AnalyticsLoadFailure, Error, LOAD_FAILURE_MESSAGE, Result};
pub use types::{
    CorridorPerformance, DashboardSnapshot, DashboardStats, StateUpdate, TimeSeriesPoint, ViewState,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `logging.level`. `logging.format`
/// selects JSON or plain text output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    installed.map_err(|e| Error::Configuration {
        message: format!("Failed to initialize logging: {e}"),
    })
}
