//! Error types for the web server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::io;
use thiserror::Error;
use tracing::error;

/// Result type alias for web server operations
pub type WebResult<T> = Result<T, WebError>;

/// Errors raised by the web server and its handlers
#[derive(Error, Debug)]
pub enum WebError {
    /// Configuration, source or controller error
    #[error(transparent)]
    Core(#[from] stellar_insights_core::Error),

    /// Invalid listen address
    #[error("Invalid listen address '{address}': {reason}")]
    InvalidAddress {
        /// Address as configured
        address: String,
        /// Parse failure
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Core(stellar_insights_core::Error::Disposed) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!(error = %self, status = status.as_u16(), "Request failed");

        (status, status.canonical_reason().unwrap_or("Error")).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WebError::InvalidAddress {
            address: "not-an-ip".to_string(),
            reason: "invalid IP address syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid listen address 'not-an-ip': invalid IP address syntax"
        );

        let error = WebError::from(stellar_insights_core::Error::Status { status: 502 });
        assert_eq!(
            error.to_string(),
            stellar_insights_core::Error::Status { status: 502 }.to_string()
        );
    }

    #[test]
    fn test_disposed_maps_to_service_unavailable() {
        let response = WebError::from(stellar_insights_core::Error::Disposed).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = WebError::from(io::Error::other("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
