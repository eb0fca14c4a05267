//! Types for the hosted service API requests and responses.

use chrono::{DateTime, Utc};
use podcast_core::{AssetRef, Episode, EpisodeId, Series, SeriesId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to the hosted service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service (e.g., "https://project.example.co")
    pub url: String,
    /// Public API key, sent with every request
    pub api_key: String,
    /// User access token; the API key is used as bearer when absent
    pub access_token: Option<String>,
    /// Bucket holding episode audio
    pub audio_bucket: String,
    /// Bucket holding cover images
    pub cover_bucket: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with default buckets and timeout.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            access_token: None,
            audio_bucket: "audio".to_string(),
            cover_bucket: "covers".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Use a user access token as bearer.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the storage buckets.
    pub fn with_buckets(mut self, audio: impl Into<String>, cover: impl Into<String>) -> Self {
        self.audio_bucket = audio.into();
        self.cover_bucket = cover.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Token sent as `Authorization: Bearer`.
    pub(crate) fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}

// =============================================================================
// Catalog Rows
// =============================================================================

/// Row of the `series` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Object path inside the cover bucket
    #[serde(default)]
    pub cover_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SeriesRow {
    /// Convert into the domain type.
    pub fn into_series(self, cover_bucket: &str) -> Series {
        Series {
            id: SeriesId::new(self.id),
            title: self.title,
            description: self.description,
            author: self.author,
            cover: asset(cover_bucket, self.cover_path),
            created_at: self.created_at,
        }
    }
}

/// Row of the `episodes` table.
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeRow {
    pub id: String,
    pub series_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Object path inside the audio bucket
    pub audio_path: String,
    /// Object path inside the cover bucket
    #[serde(default)]
    pub cover_path: Option<String>,
    /// Filled in by the duration-extraction job; may lag behind upload
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub episode_number: Option<u32>,
    pub published_at: DateTime<Utc>,
}

impl EpisodeRow {
    /// Convert into the domain type.
    pub fn into_episode(self, audio_bucket: &str, cover_bucket: &str) -> Episode {
        Episode {
            id: EpisodeId::new(self.id),
            series_id: SeriesId::new(self.series_id),
            title: self.title,
            description: self.description,
            audio: AssetRef::new(audio_bucket, self.audio_path),
            cover: asset(cover_bucket, self.cover_path),
            duration_secs: self.duration_seconds,
            episode_number: self.episode_number,
            published_at: self.published_at,
        }
    }
}

fn asset(bucket: &str, path: Option<String>) -> Option<AssetRef> {
    path.filter(|p| !p.trim().is_empty())
        .map(|p| AssetRef::new(bucket, p))
}

// =============================================================================
// Storage Types
// =============================================================================

/// Request body for the object signing endpoint.
#[derive(Debug, Serialize)]
pub struct SignRequest {
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

/// Response from the object signing endpoint.
#[derive(Debug, Deserialize)]
pub struct SignResponse {
    /// Path relative to the storage API root, including the token query
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}

/// Episode with everything a player needs to load and display it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEpisode {
    pub episode: Episode,
    /// Title of the owning series, when it could be fetched
    pub series_title: Option<String>,
    /// Fetchable audio URL (public or signed)
    pub audio_url: String,
    /// Cover URL (episode cover, else series cover)
    pub cover_url: Option<String>,
}
