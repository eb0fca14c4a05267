/// Series domain type
use crate::types::{AssetRef, SeriesId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Podcast series (a show)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Unique series identifier
    pub id: SeriesId,

    /// Series title
    pub title: String,

    /// Long-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Author or host name
    #[serde(default)]
    pub author: Option<String>,

    /// Cover image asset
    #[serde(default)]
    pub cover: Option<AssetRef>,

    /// When the series was created
    pub created_at: DateTime<Utc>,
}

impl Series {
    /// Create a new series with minimal metadata
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SeriesId::generate(),
            title: title.into(),
            description: None,
            author: None,
            cover: None,
            created_at: Utc::now(),
        }
    }

    /// Set the cover asset
    pub fn with_cover(mut self, cover: AssetRef) -> Self {
        self.cover = Some(cover);
        self
    }
}
