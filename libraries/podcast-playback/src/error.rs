//! Error types for the playback session

use thiserror::Error;

/// Playback errors
///
/// The session never returns these from its commands. They are recorded as the
/// reason for `TransportState::Errored` and reported through events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The resource could not be fetched or decoded
    #[error("Failed to load audio: {0}")]
    Acquisition(String),

    /// The environment declined to start audio output
    #[error("Playback was rejected: {0}")]
    PlaybackRejected(String),

    /// A command needed a loaded source but none is loaded
    #[error("No source loaded")]
    NoSourceLoaded,
}

impl PlaybackError {
    /// Create an acquisition error
    pub fn acquisition(reason: impl Into<String>) -> Self {
        Self::Acquisition(reason.into())
    }

    /// Create a playback-rejected error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::PlaybackRejected(reason.into())
    }

    /// Human-readable failure reason for the view layer
    pub fn reason(&self) -> String {
        match self {
            Self::Acquisition(reason) | Self::PlaybackRejected(reason) => reason.clone(),
            Self::NoSourceLoaded => self.to_string(),
        }
    }
}

/// Result type for media backend operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
