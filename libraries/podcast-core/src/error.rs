/// Core error types for Podcast Player
use thiserror::Error;

/// Result type alias using `PodcastError`
pub type Result<T> = std::result::Result<T, PodcastError>;

/// Core error type for Podcast Player
#[derive(Error, Debug)]
pub enum PodcastError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error talking to the hosted service
    #[error("Network error: {0}")]
    Network(String),

    /// Asset storage errors (missing object, signing failure)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Permission denied by the hosted service
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl PodcastError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
