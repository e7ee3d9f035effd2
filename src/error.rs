//! Common error types for the annotation agent

use thiserror::Error;

/// Common result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, DNS, timeout, or other transport failure (wraps reqwest::Error)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response, carrying the original status code and body
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body could not be decoded into the expected type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
