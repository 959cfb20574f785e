//! Error types for Stellar Insights

use std::{error::Error as StdError, fmt};

/// Message shown to users whenever the dashboard payload cannot be loaded.
///
/// Every failure from the analytics source collapses to this text; the
/// underlying cause only goes to the log.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load analytics data. Please try again later.";

/// Main error type for Stellar Insights
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Transport-level failure talking to the analytics source
    Request(String),

    /// Analytics source answered with a non-success status
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Timeout error
    Timeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// The dashboard controller was disposed
    Disposed,

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Request(msg) => write!(f, "Request failed: {msg}"),
            Self::Status { status } => write!(f, "Analytics source returned status {status}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Timeout { duration_ms } => {
                write!(f, "Operation timed out after {duration_ms}ms")
            }
            Self::Disposed => write!(f, "Dashboard controller has been disposed"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        match first_field_error(&errors, "") {
            Some((field, message)) => Self::Validation { field, message },
            None => Self::Validation {
                field: "config".to_string(),
                message: errors.to_string(),
            },
        }
    }
}

/// First failing field in name order, with its dotted path
fn first_field_error(
    errors: &validator::ValidationErrors,
    prefix: &str,
) -> Option<(String, String)> {
    use validator::ValidationErrorsKind;

    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        let found = match kind {
            ValidationErrorsKind::Field(failures) => failures.first().map(|failure| {
                let message = failure
                    .message
                    .as_ref()
                    .map_or_else(|| failure.code.to_string(), ToString::to_string);
                (path, message)
            }),
            ValidationErrorsKind::Struct(nested) => first_field_error(nested, &path),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(index, nested)| first_field_error(nested, &format!("{path}[{index}]"))),
        };

        if found.is_some() {
            return found;
        }
    }

    None
}

/// The single user-facing failure of the dashboard.
///
/// Wraps whatever went wrong so it can be logged, while [`fmt::Display`]
/// always yields [`LOAD_FAILURE_MESSAGE`].
#[derive(Debug)]
pub struct AnalyticsLoadFailure {
    cause: Error,
}

impl AnalyticsLoadFailure {
    /// Wrap an underlying error
    pub const fn new(cause: Error) -> Self {
        Self { cause }
    }

    /// The underlying error, for diagnostics only
    pub const fn cause(&self) -> &Error {
        &self.cause
    }

    /// Text that may be shown to a user
    pub const fn user_message(&self) -> &'static str {
        LOAD_FAILURE_MESSAGE
    }
}

impl fmt::Display for AnalyticsLoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(LOAD_FAILURE_MESSAGE)
    }
}

impl StdError for AnalyticsLoadFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

impl From<Error> for AnalyticsLoadFailure {
    fn from(cause: Error) -> Self {
        Self::new(cause)
    }
}
