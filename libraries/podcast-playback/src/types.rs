//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport state of the session
///
/// Exactly one state is active at a time. Volume, rate and repeat are
/// independent of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing loaded
    Idle,

    /// Resource acquisition in progress
    Loading,

    /// Audio output running
    Playing,

    /// Loaded but not playing
    Paused,

    /// Reached the natural end (repeat off)
    Ended,

    /// Acquisition or playback start failed; see `PlaybackSession::failure`
    Errored,
}

impl TransportState {
    /// Whether a resource is loaded and position reporting is meaningful
    pub fn has_timeline(self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::Ended)
    }
}

/// Playback rate, one of a fixed ordered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackRate {
    /// 1x
    #[default]
    X1,
    /// 1.25x
    X1_25,
    /// 1.5x
    X1_5,
    /// 1.75x
    X1_75,
    /// 2x
    X2,
}

impl PlaybackRate {
    /// All rates in cycle order
    pub const ALL: [PlaybackRate; 5] = [
        PlaybackRate::X1,
        PlaybackRate::X1_25,
        PlaybackRate::X1_5,
        PlaybackRate::X1_75,
        PlaybackRate::X2,
    ];

    /// Speed multiplier
    pub fn multiplier(self) -> f32 {
        match self {
            Self::X1 => 1.0,
            Self::X1_25 => 1.25,
            Self::X1_5 => 1.5,
            Self::X1_75 => 1.75,
            Self::X2 => 2.0,
        }
    }

    /// Next rate in the cycle, wrapping from 2x back to 1x
    pub fn next(self) -> Self {
        match self {
            Self::X1 => Self::X1_25,
            Self::X1_25 => Self::X1_5,
            Self::X1_5 => Self::X1_75,
            Self::X1_75 => Self::X2,
            Self::X2 => Self::X1,
        }
    }

    /// Look up the rate for an exact multiplier
    pub fn from_multiplier(multiplier: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| (rate.multiplier() - multiplier).abs() < f32::EPSILON)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

/// What the session is told to load
///
/// Only `url` drives playback; the rest is carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSource {
    /// Fetchable audio URL (public or signed)
    pub url: String,

    /// Episode title
    pub title: Option<String>,

    /// Title of the owning series
    pub series_title: Option<String>,

    /// Cover image URL
    pub cover_url: Option<String>,
}

impl EpisodeSource {
    /// Source with a URL and no display metadata
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            series_title: None,
            cover_url: None,
        }
    }

    /// Set the episode title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the series title
    pub fn with_series_title(mut self, series_title: impl Into<String>) -> Self {
        self.series_title = Some(series_title.into());
        self
    }

    /// Set the cover URL
    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }
}

/// Commands sent to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Load a source, optionally starting playback once loaded
    Load {
        /// What to load
        source: EpisodeSource,
        /// Start playing as soon as the resource is ready
        autoplay: bool,
    },

    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Seek to position (in seconds)
    Seek(f64),

    /// Seek relative to the current position (in seconds)
    Skip(f64),

    /// Set volume (0.0-1.0)
    SetVolume(f32),

    /// Toggle mute
    ToggleMute,

    /// Advance to the next playback rate
    CyclePlaybackRate,

    /// Set a specific playback rate
    SetPlaybackRate(PlaybackRate),

    /// Toggle repeat
    ToggleRepeat,

    /// Release the resource and return to idle
    Unload,
}

/// Generation counter for resource acquisitions
///
/// Every `load` gets a fresh id. Media events carry the id of the acquisition
/// that produced them; events with an old id are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LoadId(u64);

impl LoadId {
    /// Raw generation number
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial playback rate (default: 1x)
    pub rate: PlaybackRate,

    /// Initial repeat flag (default: false)
    pub repeat: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            rate: PlaybackRate::X1,
            repeat: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.rate, PlaybackRate::X1);
        assert!(!config.repeat);
    }

    #[test]
    fn rate_cycle_wraps() {
        let mut rate = PlaybackRate::X1;
        let mut seen = vec![rate.multiplier()];
        for _ in 0..5 {
            rate = rate.next();
            seen.push(rate.multiplier());
        }
        assert_eq!(seen, vec![1.0, 1.25, 1.5, 1.75, 2.0, 1.0]);
    }

    #[test]
    fn rate_lookup() {
        assert_eq!(PlaybackRate::from_multiplier(1.5), Some(PlaybackRate::X1_5));
        assert_eq!(PlaybackRate::from_multiplier(3.0), None);
        assert_eq!(PlaybackRate::X1_75.to_string(), "1.75x");
    }

    #[test]
    fn timeline_states() {
        assert!(TransportState::Playing.has_timeline());
        assert!(TransportState::Ended.has_timeline());
        assert!(!TransportState::Loading.has_timeline());
        assert!(!TransportState::Errored.has_timeline());
    }

    #[test]
    fn load_ids_advance() {
        let first = LoadId::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn episode_source_builder() {
        let source = EpisodeSource::from_url("https://cdn/ep1.mp3")
            .with_title("Pilot")
            .with_series_title("Show")
            .with_cover_url("https://cdn/cover.png");
        assert_eq!(source.url, "https://cdn/ep1.mp3");
        assert_eq!(source.title.as_deref(), Some("Pilot"));
        assert_eq!(source.series_title.as_deref(), Some("Show"));
        assert_eq!(source.cover_url.as_deref(), Some("https://cdn/cover.png"));
    }
}
