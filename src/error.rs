// Error handling module
// Defines the error type returned by every client operation

use thiserror::Error;

/// Errors that can occur while talking to the Bank Account Data API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure or timeout in the HTTP transport
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token endpoint answered with a non-success status
    #[error("Token request failed: {status} - {body}")]
    RemoteAuth { status: u16, body: String },

    /// Internal state that should be unreachable (logic bug, not an external fault)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Business endpoint answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid construction input
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the remote side answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RemoteAuth { status, .. } | ClientError::Api { status, .. } => {
                Some(*status)
            }
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short machine-readable category, used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport(e) if e.is_timeout() => "timeout",
            ClientError::Transport(e) if e.is_connect() => "connection_failed",
            ClientError::Transport(_) => "transport",
            ClientError::RemoteAuth { .. } => "remote_auth",
            ClientError::InvariantViolation(_) => "invariant_violation",
            ClientError::Api { .. } => "api_error",
            ClientError::Decode(_) => "decode_error",
            ClientError::Config(_) => "config_error",
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
