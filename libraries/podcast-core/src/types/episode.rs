/// Episode domain type
use crate::types::{AssetRef, EpisodeId, Series, SeriesId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single playable episode of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Unique episode identifier
    pub id: EpisodeId,

    /// Owning series
    pub series_id: SeriesId,

    /// Episode title
    pub title: String,

    /// Show notes
    #[serde(default)]
    pub description: Option<String>,

    /// Audio asset
    pub audio: AssetRef,

    /// Episode-specific cover (falls back to the series cover)
    #[serde(default)]
    pub cover: Option<AssetRef>,

    /// Duration in seconds, when the catalog knows it
    #[serde(default)]
    pub duration_secs: Option<f64>,

    /// Position within the series
    #[serde(default)]
    pub episode_number: Option<u32>,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

impl Episode {
    /// Create a new episode with minimal metadata
    pub fn new(series_id: SeriesId, title: impl Into<String>, audio: AssetRef) -> Self {
        Self {
            id: EpisodeId::generate(),
            series_id,
            title: title.into(),
            description: None,
            audio,
            cover: None,
            duration_secs: None,
            episode_number: None,
            published_at: Utc::now(),
        }
    }

    /// Set the catalog duration
    pub fn with_duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Catalog duration as a `Duration`
    ///
    /// Negative or non-finite values stored in the catalog are treated as unknown.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Cover to display: the episode's own, else the series cover
    pub fn display_cover<'a>(&'a self, series: Option<&'a Series>) -> Option<&'a AssetRef> {
        self.cover
            .as_ref()
            .or_else(|| series.and_then(|s| s.cover.as_ref()))
    }

    /// Formatted duration (`h:mm:ss` or `m:ss`)
    pub fn duration_label(&self) -> Option<String> {
        self.duration().map(|d| format_clock(d.as_secs_f64()))
    }
}

/// Format seconds as `h:mm:ss` or `m:ss`
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Episode {
        Episode::new(
            SeriesId::new("s1"),
            "Pilot",
            AssetRef::new("audio", "s1/pilot.mp3"),
        )
    }

    #[test]
    fn cover_falls_back_to_series() {
        let series = Series::new("Show").with_cover(AssetRef::new("covers", "show.png"));
        let mut ep = episode();

        assert_eq!(
            ep.display_cover(Some(&series)),
            Some(&AssetRef::new("covers", "show.png"))
        );
        assert_eq!(ep.display_cover(None), None);

        ep.cover = Some(AssetRef::new("covers", "pilot.png"));
        assert_eq!(
            ep.display_cover(Some(&series)),
            Some(&AssetRef::new("covers", "pilot.png"))
        );
    }

    #[test]
    fn invalid_durations_are_unknown() {
        assert_eq!(episode().duration(), None);
        assert_eq!(episode().with_duration_secs(-3.0).duration(), None);
        assert_eq!(episode().with_duration_secs(f64::NAN).duration(), None);
        assert_eq!(
            episode().with_duration_secs(90.5).duration(),
            Some(Duration::from_secs_f64(90.5))
        );
    }

    #[test]
    fn duration_labels() {
        assert_eq!(
            episode().with_duration_secs(65.9).duration_label().as_deref(),
            Some("1:05")
        );
        assert_eq!(
            episode().with_duration_secs(3725.0).duration_label().as_deref(),
            Some("1:02:05")
        );
    }

    #[test]
    fn deserialize_catalog_row() {
        let json = r#"{
            "id": "e1",
            "series_id": "s1",
            "title": "Pilot",
            "audio": "audio/s1/pilot.mp3",
            "duration_secs": 1800.0,
            "episode_number": 1,
            "published_at": "2024-03-02T08:30:00Z"
        }"#;

        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.id.as_str(), "e1");
        assert_eq!(ep.audio.path, "s1/pilot.mp3");
        assert_eq!(ep.episode_number, Some(1));
        assert_eq!(ep.cover, None);
    }
}
