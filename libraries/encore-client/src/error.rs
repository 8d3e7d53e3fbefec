//! Error types for the Encore client.

use encore_core::EncoreError;
use thiserror::Error;

/// Errors that can occur when talking to the music service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available (or token rejected)
    #[error("Authentication required")]
    AuthRequired,

    /// Login rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Sign-up rejected
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before being sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for EncoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) if e.is_decode() => Self::Parse(e.to_string()),
            ClientError::Request(e) => Self::Network(e.to_string()),
            ClientError::ServerError { status, message } => Self::Api { status, message },
            ClientError::AuthRequired => Self::AuthRequired,
            ClientError::AuthFailed(message) => Self::Api {
                status: 401,
                message,
            },
            ClientError::InvalidUrl(msg)
            | ClientError::InvalidInput(msg)
            | ClientError::RegistrationFailed(msg) => Self::InvalidInput(msg),
            ClientError::ParseError(msg) => Self::Parse(msg),
            ClientError::ServerUnreachable(msg) => Self::Network(msg),
        }
    }
}
