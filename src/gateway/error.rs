//! Gateway error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while generating text from a backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx answer. Shows the backend's own message; the status is logged.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("no response from API: empty candidates or parts")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no response from backend after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("missing API key")]
    MissingApiKey,

    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),
}
