//! Client error types
use reqwest::StatusCode;
use serde::Deserialize;
use taskdeck_core::ValidationError;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the Taskdeck client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client-side input problems; the request was never sent
    #[error("Validation failed: {}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    /// The server answered 401; the session has been torn down
    #[error("Session expired or invalid. Please log in again")]
    Unauthorized,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session was replaced or ended while the request was in flight
    #[error("Session changed while the request was in flight")]
    SessionChanged,

    #[error("Request cancelled")]
    Cancelled,
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull a human readable message out of an error body, if it has one
pub(crate) fn message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

impl ClientError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build an error from a non-success, non-401 response
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = message_from_body(&body).unwrap_or_else(|| {
            format!(
                "Request failed: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        });

        if status == StatusCode::NOT_FOUND {
            Self::NotFound(message)
        } else {
            Self::Server {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Check if this is an authorization failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::NotAuthenticated)
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Whether a manual retry could succeed without user changes
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Server { .. } | ClientError::InvalidResponse(_)
        )
    }

    /// Field-scoped validation errors, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<Vec<ValidationError>> for ClientError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}
