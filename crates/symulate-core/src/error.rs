//! Error types for symulate.

use serde_json::Value;
use thiserror::Error;

/// Result type alias using symulate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for symulate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration. The message always carries
    /// remediation guidance; callers must not retry.
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required call parameters were absent. Every missing
    /// parameter is listed, not just the first.
    #[error("Missing required parameters: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The generation service rejected the API key (HTTP 401).
    #[error("Invalid API key: {0}")]
    RemoteAuth(String),

    /// The generation service reported quota exhaustion (HTTP 429).
    /// Retryable only by falling back to the local generator.
    #[error("AI generation quota exceeded")]
    RemoteQuota {
        used: Option<u64>,
        limit: Option<u64>,
    },

    /// The generation service failed with any other non-2xx status or a
    /// transport error.
    #[error("Generation request failed: {message}")]
    RemoteGeneration {
        status: Option<u16>,
        message: String,
    },

    /// Deliberate error raised by an endpoint with a force-triggered
    /// error spec. Carries the author-chosen status and payload.
    #[error("Simulated error {status}")]
    Simulated { status: u16, data: Value },

    /// The real backend returned a non-2xx response in pass-through mode.
    #[error("Backend request failed: {status} {status_text}")]
    BackendForward { status: u16, status_text: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
