//! Error types for the hosted service client.

use podcast_core::PodcastError;
use thiserror::Error;

/// Errors that can occur when talking to the hosted catalog/storage service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// API key or access token rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested record or object does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid service URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse service response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Service is offline or unreachable
    #[error("Service unreachable: {0}")]
    ServiceUnreachable(String),
}

impl ClientError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Classify a transport failure
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServiceUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ClientError> for PodcastError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotFound { entity, id } => PodcastError::NotFound { entity, id },
            ClientError::Unauthorized(msg) => PodcastError::PermissionDenied(msg),
            ClientError::InvalidUrl(msg) => PodcastError::InvalidInput(msg),
            ClientError::ParseError(msg) => PodcastError::Other(msg),
            other @ (ClientError::Request(_)
            | ClientError::ServerError { .. }
            | ClientError::ServiceUnreachable(_)) => PodcastError::Network(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
