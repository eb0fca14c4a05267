/// CLI error types
use podcast_client::ClientError;
use podcast_core::PodcastError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service error: {0}")]
    Client(#[from] ClientError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] PodcastError),

    #[error("Playback failed: {0}")]
    Playback(String),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
