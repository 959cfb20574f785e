//! HTTP client for the analytics service

use crate::source::AnalyticsSource;
use async_trait::async_trait;
use reqwest::Client;
use stellar_insights_core::{DashboardSnapshot, Error, Result, SourceConfig};
use tracing::debug;

/// Fetches dashboard snapshots over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    dashboard_url: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl ApiClient {
    /// Create a client for the given dashboard endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(dashboard_url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            dashboard_url: dashboard_url.into(),
            api_key: None,
            timeout_ms,
        })
    }

    /// Create a client from the `source` section of the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let client = Self::new(config.dashboard_url(), config.request_timeout_ms)?;
        Ok(match &config.api_key {
            Some(api_key) => client.with_api_key(api_key.clone()),
            None => client,
        })
    }

    /// Set the API key for authentication
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Endpoint this client fetches from
    pub fn dashboard_url(&self) -> &str {
        &self.dashboard_url
    }
}

#[async_trait]
impl AnalyticsSource for ApiClient {
    async fn fetch_dashboard_snapshot(&self) -> Result<DashboardSnapshot> {
        debug!(url = %self.dashboard_url, "Fetching dashboard snapshot");

        let mut request = self.client.get(&self.dashboard_url);

        if let Some(ref api_key) = self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    duration_ms: self.timeout_ms,
                }
            } else {
                Error::Request(format!("Failed to fetch dashboard snapshot: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Request(format!("Failed to read dashboard snapshot: {e}")))?;

        Ok(serde_json::from_slice(&body)?)
    }

    fn name(&self) -> &str {
        "http"
    }
}
