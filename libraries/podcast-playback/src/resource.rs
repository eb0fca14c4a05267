//! Media resource capability
//!
//! Abstracts the native thing that actually fetches, decodes and outputs audio
//! for a URL (a browser media element, a desktop decoder, a test fake).

use crate::error::Result;
use crate::types::LoadId;
use serde::{Deserialize, Serialize};

/// Acquires media resources for URLs
///
/// `acquire` must return immediately. Completion is reported later as
/// `MediaEvent::Loaded` (or `MediaEvent::Error`) tagged with the given `LoadId`
/// and delivered to the session.
pub trait MediaBackend: Send {
    /// Begin acquiring the resource at `url`
    ///
    /// # Returns
    /// * `Ok(resource)` - Handle to the resource being acquired
    /// * `Err(_)` - Acquisition failed synchronously (bad URL, unsupported scheme)
    fn acquire(&mut self, url: &str, load: LoadId) -> Result<Box<dyn MediaResource>>;
}

/// Handle to one acquired media resource
pub trait MediaResource: Send {
    /// Start audio output
    ///
    /// # Returns
    /// * `Ok(())` - Output started
    /// * `Err(_)` - The environment declined playback (e.g. no user gesture)
    fn play(&mut self) -> Result<()>;

    /// Halt audio output, keeping the position
    fn pause(&mut self);

    /// Jump to `position_secs` from the start
    ///
    /// Completion is reported as `MediaEvent::Seeked`.
    fn seek(&mut self, position_secs: f64);

    /// Set the audible output gain (0.0-1.0, 0.0 when muted)
    fn set_volume(&mut self, gain: f32);

    /// Set the playback speed multiplier
    fn set_rate(&mut self, rate: f32);

    /// Release the underlying resource
    ///
    /// Called once before the handle is dropped. No events may be produced
    /// for this resource afterwards.
    fn release(&mut self) {}
}

/// Asynchronous events produced by a media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Resource is ready; duration is known
    Loaded {
        /// Total duration in seconds
        duration_secs: f64,
    },

    /// Periodic clock sample (best-effort, lossy)
    TimeUpdate {
        /// Current position in seconds
        position_secs: f64,
    },

    /// A seek has completed; clock samples from here on reflect it
    Seeked {
        /// Position the resource landed on, in seconds
        position_secs: f64,
    },

    /// Resource reached its natural end
    Ended,

    /// Resource failed (fetch, decode, or stream error)
    Error {
        /// Human-readable reason
        reason: String,
    },
}

/// A media event tagged with the acquisition that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaNotification {
    /// Acquisition generation
    pub load: LoadId,

    /// The event
    pub event: MediaEvent,
}

/// Recording backend for unit tests
///
/// Records every call made on the resources it hands out. Events are not
/// produced automatically; tests feed them to the session by hand.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    log: std::sync::Arc<std::sync::Mutex<ScriptedLog>>,
}

#[cfg(test)]
#[derive(Default)]
struct ScriptedLog {
    acquired: Vec<String>,
    failing_urls: Vec<String>,
    reject_play: bool,
    play_calls: usize,
    seeks: Vec<f64>,
    gains: Vec<f32>,
    rates: Vec<f32>,
    released: usize,
}

#[cfg(test)]
impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, ScriptedLog> {
        self.log.lock().unwrap()
    }

    pub(crate) fn fail_acquire(&self, url: &str) {
        self.log().failing_urls.push(url.to_string());
    }

    pub(crate) fn reject_play(&self, reject: bool) {
        self.log().reject_play = reject;
    }

    pub(crate) fn acquired_urls(&self) -> Vec<String> {
        self.log().acquired.clone()
    }

    pub(crate) fn play_calls(&self) -> usize {
        self.log().play_calls
    }

    pub(crate) fn seeks(&self) -> Vec<f64> {
        self.log().seeks.clone()
    }

    pub(crate) fn last_gain(&self) -> Option<f32> {
        self.log().gains.last().copied()
    }

    pub(crate) fn last_rate(&self) -> Option<f32> {
        self.log().rates.last().copied()
    }

    pub(crate) fn released(&self) -> usize {
        self.log().released
    }
}

#[cfg(test)]
impl MediaBackend for ScriptedBackend {
    fn acquire(&mut self, url: &str, _load: LoadId) -> Result<Box<dyn MediaResource>> {
        let mut log = self.log();
        log.acquired.push(url.to_string());
        if log.failing_urls.iter().any(|u| u == url) {
            return Err(crate::error::PlaybackError::acquisition(format!(
                "cannot fetch {}",
                url
            )));
        }
        drop(log);
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
impl MediaResource for ScriptedBackend {
    fn play(&mut self) -> Result<()> {
        let mut log = self.log();
        log.play_calls += 1;
        if log.reject_play {
            return Err(crate::error::PlaybackError::rejected("autoplay blocked"));
        }
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, position_secs: f64) {
        self.log().seeks.push(position_secs);
    }

    fn set_volume(&mut self, gain: f32) {
        self.log().gains.push(gain);
    }

    fn set_rate(&mut self, rate: f32) {
        self.log().rates.push(rate);
    }

    fn release(&mut self) {
        self.log().released += 1;
    }
}
