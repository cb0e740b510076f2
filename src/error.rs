//! Error types for color-analyzer
//!
//! The error taxonomy mirrors the three failure classes of the upload
//! pipeline:
//! - Configuration errors (bad base URL, zero timeout) caught at build time
//! - Transport errors (network unreachable, timeout, malformed response)
//! - Service-reported errors (non-2xx `detail`, per-entry embedded errors)
//!
//! Transport and service errors are recovered at the item level by the
//! orchestrator and surfaced through item status fields; they never abort
//! processing of sibling items.

use thiserror::Error;

/// Result type alias for color-analyzer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback message used when a failed response carries no parseable detail
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Main error type for color-analyzer
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "service.base_url")
        key: Option<String>,
    },

    /// Network error (connection failure, timeout, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service rejected the request and reported a reason
    #[error("service error: {message}")]
    Service {
        /// The `detail` string from the service, or the generic fallback
        message: String,
        /// HTTP status code of the failed response, if one was received
        status: Option<u16>,
    },

    /// Response body could not be interpreted per the service contract
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No active session to operate on
    #[error("no active session")]
    NoSession,

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Construct a configuration error for a specific key.
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// The message to surface on an item when this error fails it.
    ///
    /// Service-reported detail strings pass through verbatim; transport and
    /// contract failures collapse to the generic fallback so the UI never
    /// shows raw connection internals.
    pub fn surface_message(&self) -> String {
        match self {
            Error::Service { message, .. } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
