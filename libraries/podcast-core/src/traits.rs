/// Collaborator traits for Podcast Player
use crate::error::Result;
use crate::types::{AssetRef, Episode, EpisodeId, Series, SeriesId};
use async_trait::async_trait;
use std::time::Duration;

/// Read access to the series/episode catalog
///
/// Implementations talk to whatever backs the catalog (the hosted REST
/// service in `podcast-client`, an in-memory fixture in tests).
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// List all series, newest first
    async fn list_series(&self) -> Result<Vec<Series>>;

    /// Get a single series
    ///
    /// # Errors
    /// Returns `PodcastError::NotFound` if no series has this id
    async fn get_series(&self, id: &SeriesId) -> Result<Series>;

    /// List the episodes of a series, newest first
    async fn list_episodes(&self, series_id: &SeriesId) -> Result<Vec<Episode>>;

    /// Get a single episode
    ///
    /// # Errors
    /// Returns `PodcastError::NotFound` if no episode has this id
    async fn get_episode(&self, id: &EpisodeId) -> Result<Episode>;

    /// Case-insensitive substring search over episode titles
    async fn search_episodes(&self, query: &str, limit: usize) -> Result<Vec<Episode>>;
}

/// Resolves asset references to fetchable URLs
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Public URL for an asset (no authorization)
    fn public_url(&self, asset: &AssetRef) -> Result<String>;

    /// Time-limited, authorization-bearing URL for a private asset
    async fn signed_url(&self, asset: &AssetRef, expires_in: Duration) -> Result<String>;
}
