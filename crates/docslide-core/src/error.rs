//! Error types for docslide.

use thiserror::Error;

/// Result type alias using docslide's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docslide operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Missing credentials or invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider identifier is not registered
    #[error("Unknown AI provider \"{0}\".")]
    UnknownProvider(String),

    /// Provider lacks the requested operation
    #[error("Provider \"{provider}\" does not support \"{operation}\".")]
    UnsupportedOperation { provider: String, operation: String },

    /// Model output failed JSON parsing or schema checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, timeout or rate-limit failure that may succeed on a later attempt
    #[error("Transient provider error: {0}")]
    Transient(String),

    /// Provider answered with a non-retryable failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error carries an explicit retryable flag.
    ///
    /// Message-based classification lives with the retry policy; this only
    /// reports what the variant itself asserts.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Transient(format!("request timeout: {}", e))
        } else if e.is_connect() {
            Error::Transient(format!("network unreachable: {}", e))
        } else {
            Error::Request(e.to_string())
        }
    }
}
