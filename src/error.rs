// Error types for svcpoll

use thiserror::Error;

/// Result type alias using anyhow::Error
pub type Result<T> = anyhow::Result<T>;

/// Result of a call against the `/service` endpoint
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Svcpoll-specific error types
#[derive(Error, Debug)]
pub enum SvcpollError {
    #[error("Invalid server URL '{url}': {message}")]
    ServerUrl { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Outcome of a failed call against the `/service` endpoint
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// Text suitable for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { body, status } if !body.trim().is_empty() => {
                format!("{} (HTTP {})", body.trim(), status)
            }
            ApiError::Status { status, .. } => format!("Server answered HTTP {}", status),
            other => other.to_string(),
        }
    }
}
