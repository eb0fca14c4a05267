//! Podcast Player - Playback Session
//!
//! Platform-agnostic audio playback session for Podcast Player.
//!
//! This crate provides:
//! - Transport state machine (Idle, Loading, Playing, Paused, Ended, Errored)
//! - Seek and relative skip, clamped to the known duration
//! - Volume control (0.0-1.0, mute/unmute)
//! - Playback rate cycling (1x, 1.25x, 1.5x, 1.75x, 2x)
//! - Repeat at natural end
//! - Last-load-wins supersession of in-flight loads
//! - One shared session per application with broadcast state
//!
//! # Architecture
//!
//! `podcast-playback` knows nothing about catalogs, storage or UI:
//! - Audio fetch/decode/output is a [`MediaBackend`] capability
//! - Resource completion arrives as [`MediaEvent`]s tagged with a [`LoadId`]
//! - Views hold a [`SessionHandle`] and observe [`SessionSnapshot`]s
//!
//! A [`HeadlessBackend`] is included for tools and tests that need a
//! playback clock without audio output.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use podcast_playback::{
//!     EpisodeSource, HeadlessBackend, SessionCommand, SessionConfig, SessionHost, TransportState,
//! };
//! use std::time::Duration;
//!
//! let (backend, notifications) = HeadlessBackend::new();
//! backend.register("https://cdn.example.com/ep1.mp3", Duration::from_secs(120));
//!
//! let host = SessionHost::new(Box::new(backend.clone()), SessionConfig::default());
//! let player = host.handle();
//!
//! player.dispatch(SessionCommand::Load {
//!     source: EpisodeSource::from_url("https://cdn.example.com/ep1.mp3").with_title("Pilot"),
//!     autoplay: true,
//! });
//! assert_eq!(player.snapshot().state, TransportState::Loading);
//!
//! // Resource reports it has loaded; deferred play starts
//! player.deliver_all(notifications.try_iter());
//! assert_eq!(player.snapshot().state, TransportState::Playing);
//!
//! backend.tick(Duration::from_secs(5));
//! player.deliver_all(notifications.try_iter());
//! assert_eq!(player.snapshot().position_secs, 5.0);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use podcast_playback::{LoadId, MediaBackend, MediaResource, Result};
//!
//! // Implement MediaBackend for your platform
//! struct MyBackend;
//!
//! struct MyResource;
//!
//! impl MediaResource for MyResource {
//!     fn play(&mut self) -> Result<()> {
//!         // Start the platform's audio output
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position_secs: f64) {}
//!     fn set_volume(&mut self, _gain: f32) {}
//!     fn set_rate(&mut self, _rate: f32) {}
//! }
//!
//! impl MediaBackend for MyBackend {
//!     fn acquire(&mut self, _url: &str, _load: LoadId) -> Result<Box<dyn MediaResource>> {
//!         // Start fetching; report MediaEvent::Loaded for `_load` when ready
//!         Ok(Box::new(MyResource))
//!     }
//! }
//! ```

mod error;
pub mod events;
mod headless;
mod host;
mod resource;
mod session;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{SessionEvent, SessionSnapshot};
pub use headless::HeadlessBackend;
pub use host::{SessionHandle, SessionHost};
pub use resource::{MediaBackend, MediaEvent, MediaNotification, MediaResource};
pub use session::PlaybackSession;
pub use types::{
    EpisodeSource, LoadId, PlaybackRate, SessionCommand, SessionConfig, TransportState,
};
pub use volume::Volume;
