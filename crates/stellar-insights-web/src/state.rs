//! Application state management

use crate::api_client::ApiClient;
use crate::controller::DashboardController;
use crate::source::AnalyticsSource;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use stellar_insights_core::{Config, Result};

/// Application state holding the dashboard controller and metrics handle
#[derive(Clone)]
pub struct AppState {
    /// Controller of the analytics dashboard
    pub controller: DashboardController,
    /// Prometheus exporter handle, if a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("controller", &self.controller)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create application state backed by the configured HTTP source
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let source = ApiClient::from_config(&config.source)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Create application state backed by an arbitrary source
    pub fn with_source(config: &Config, source: Arc<dyn AnalyticsSource>) -> Self {
        let controller = DashboardController::new(source, Some(config.source.request_timeout()));
        Self {
            controller,
            metrics: None,
        }
    }

    /// Serve `handle` on `/metrics`
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
