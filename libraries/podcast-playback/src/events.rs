//! Session events and snapshots
//!
//! Event-based communication for view synchronization. Events are emitted at
//! key points:
//! - State changes (loading/playing/paused/ended/errored)
//! - Source changes (load/unload)
//! - Duration becoming known
//! - Position updates (resource clock samples, seeks)
//! - Output setting changes (volume, rate, repeat)

use crate::types::{EpisodeSource, PlaybackRate, TransportState};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Transport state changed
    StateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// A new source was loaded or the session was unloaded
    SourceChanged {
        /// The new source (`None` after unload)
        source: Option<EpisodeSource>,
    },

    /// Duration of the loaded resource became known
    DurationChanged {
        /// Total duration in seconds
        duration_secs: f64,
    },

    /// Position update (clock sample, seek, or reset)
    PositionUpdate {
        /// Current position in seconds
        position_secs: f64,
        /// Total duration in seconds, if known
        duration_secs: Option<f64>,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Stored volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Playback rate changed
    RateChanged {
        /// New rate
        rate: PlaybackRate,
    },

    /// Repeat flag changed
    RepeatChanged {
        /// Whether repeat is enabled
        enabled: bool,
    },

    /// Acquisition or playback start failed
    Error {
        /// Failure reason
        message: String,
    },
}

/// Point-in-time copy of everything a view renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Transport state
    pub state: TransportState,

    /// Loaded source and its display metadata
    pub source: Option<EpisodeSource>,

    /// Position in seconds
    pub position_secs: f64,

    /// Duration in seconds, if known
    pub duration_secs: Option<f64>,

    /// Stored volume level (0.0-1.0)
    pub volume: f32,

    /// Mute flag
    pub muted: bool,

    /// Playback rate
    pub rate: PlaybackRate,

    /// Repeat flag
    pub repeat: bool,

    /// Failure reason while `Errored`
    pub failure: Option<String>,
}

impl SessionSnapshot {
    /// Fraction of the episode played (0.0-1.0), for progress bars
    ///
    /// Returns 0.0 while the duration is unknown or zero.
    pub fn progress(&self) -> f64 {
        match self.duration_secs {
            Some(duration) if duration > 0.0 => (self.position_secs / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Whether audio is currently being output
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: TransportState::Idle,
            source: None,
            position_secs: 0.0,
            duration_secs: None,
            volume: 1.0,
            muted: false,
            rate: PlaybackRate::X1,
            repeat: false,
            failure: None,
        }
    }
}
