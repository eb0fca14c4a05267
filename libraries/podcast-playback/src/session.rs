//! Playback session - core state machine
//!
//! Owns one media resource at a time and coordinates transport state,
//! timeline, and output settings with it.

use crate::{
    error::PlaybackError,
    events::{SessionEvent, SessionSnapshot},
    resource::{MediaBackend, MediaEvent, MediaResource},
    types::{EpisodeSource, LoadId, PlaybackRate, SessionCommand, SessionConfig, TransportState},
    volume::Volume,
};
use tracing::{debug, info, warn};

/// How far a reported seek completion may be from the requested position
const SEEK_TOLERANCE_SECS: f64 = 1e-3;

/// The single live playback state machine
///
/// Commands never fail and never block: each one succeeds, is a no-op, or
/// moves the session into `TransportState::Errored`. Resource completion
/// arrives later through [`PlaybackSession::handle_media_event`].
///
/// Orchestrates:
/// - Transport state (Idle, Loading, Playing, Paused, Ended, Errored)
/// - Timeline (position, duration, buffered seeks)
/// - Output settings (volume/mute, playback rate, repeat)
/// - Supersession of in-flight loads (last load wins)
pub struct PlaybackSession {
    // State
    state: TransportState,
    source: Option<EpisodeSource>,
    failure: Option<PlaybackError>,

    // Timeline
    position_secs: f64,
    duration_secs: Option<f64>,

    // Settings
    volume: Volume,
    rate: PlaybackRate,
    repeat: bool,

    // Media
    backend: Box<dyn MediaBackend>,
    resource: Option<Box<dyn MediaResource>>,
    load_id: LoadId,

    // Requests deferred until the resource has loaded
    play_requested: bool,
    pending_seek: Option<f64>,

    // Seek issued to the resource and not yet confirmed
    unconfirmed_seek: Option<f64>,

    // Event queue for view synchronization
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create new playback session
    pub fn new(backend: Box<dyn MediaBackend>, config: SessionConfig) -> Self {
        Self {
            state: TransportState::Idle,
            source: None,
            failure: None,
            position_secs: 0.0,
            duration_secs: None,
            volume: Volume::new(config.volume),
            rate: config.rate,
            repeat: config.repeat,
            backend,
            resource: None,
            load_id: LoadId::default(),
            play_requested: false,
            pending_seek: None,
            unconfirmed_seek: None,
            pending_events: Vec::new(),
        }
    }

    /// Apply a command
    pub fn apply(&mut self, command: SessionCommand) {
        debug!(?command, state = ?self.state, "Applying session command");

        match command {
            SessionCommand::Load { source, autoplay } => self.load(source, autoplay),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Seek(target_secs) => self.seek(target_secs),
            SessionCommand::Skip(delta_secs) => self.skip(delta_secs),
            SessionCommand::SetVolume(level) => self.set_volume(level),
            SessionCommand::ToggleMute => self.toggle_mute(),
            SessionCommand::CyclePlaybackRate => {
                self.cycle_playback_rate();
            }
            SessionCommand::SetPlaybackRate(rate) => self.set_playback_rate(rate),
            SessionCommand::ToggleRepeat => {
                self.toggle_repeat();
            }
            SessionCommand::Unload => self.unload(),
        }
    }

    // ===== Loading =====

    /// Load a new source, tearing down the current one
    ///
    /// Valid from any state. Any pending load is superseded: events from its
    /// acquisition are ignored from now on. With `autoplay`, playback starts
    /// as soon as the resource reports it has loaded.
    pub fn load(&mut self, source: EpisodeSource, autoplay: bool) {
        info!(url = %source.url, autoplay, "Loading source");

        self.release_resource();
        self.load_id = self.load_id.next();

        self.failure = None;
        self.position_secs = 0.0;
        self.duration_secs = None;
        self.pending_seek = None;
        self.play_requested = autoplay;

        let url = source.url.clone();
        self.source = Some(source.clone());
        self.pending_events.push(SessionEvent::SourceChanged {
            source: Some(source),
        });
        self.set_state(TransportState::Loading);
        self.emit_position_update();

        match self.backend.acquire(&url, self.load_id) {
            Ok(mut resource) => {
                resource.set_volume(self.volume.gain());
                resource.set_rate(self.rate.multiplier());
                self.resource = Some(resource);
            }
            Err(e) => self.fail(PlaybackError::Acquisition(e.reason())),
        }
    }

    /// Release the resource and return to `Idle` with nothing loaded
    pub fn unload(&mut self) {
        if self.state == TransportState::Idle && self.source.is_none() {
            return;
        }

        info!("Unloading source");
        self.release_resource();
        // Invalidate any acquisition still in flight
        self.load_id = self.load_id.next();

        self.source = None;
        self.failure = None;
        self.position_secs = 0.0;
        self.duration_secs = None;
        self.pending_seek = None;
        self.play_requested = false;

        self.pending_events
            .push(SessionEvent::SourceChanged { source: None });
        self.set_state(TransportState::Idle);
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// - `Loading`: deferred until the resource has loaded
    /// - `Paused`: resumes
    /// - `Ended`: restarts (from 0 unless repeat is on)
    /// - `Errored`: reloads the current source and plays once loaded
    pub fn play(&mut self) {
        match self.state {
            TransportState::Idle => debug!("Play ignored, nothing loaded"),
            TransportState::Loading => {
                self.play_requested = true;
            }
            TransportState::Playing => {}
            TransportState::Paused => self.start_output(),
            TransportState::Ended => {
                if !self.repeat {
                    // Position was reset to 0 on end unless the user sought since
                    let restart_at = self.position_secs;
                    if let Some(ref mut resource) = self.resource {
                        resource.seek(restart_at);
                    }
                }
                self.start_output();
            }
            TransportState::Errored => self.retry(),
        }
    }

    /// Pause playback
    ///
    /// While loading, cancels a deferred play request.
    pub fn pause(&mut self) {
        match self.state {
            TransportState::Playing => {
                if let Some(ref mut resource) = self.resource {
                    resource.pause();
                }
                self.set_state(TransportState::Paused);
            }
            TransportState::Loading if self.play_requested => {
                debug!("Deferred play cancelled");
                self.play_requested = false;
            }
            _ => {}
        }
    }

    /// Reload the current source after a failure
    fn retry(&mut self) {
        match self.source.clone() {
            Some(source) => {
                info!(url = %source.url, "Retrying failed source");
                self.load(source, true);
            }
            None => debug!("Retry ignored, no source"),
        }
    }

    /// Ask the resource to start output
    fn start_output(&mut self) {
        let Some(ref mut resource) = self.resource else {
            self.fail(PlaybackError::NoSourceLoaded);
            return;
        };

        match resource.play() {
            Ok(()) => {
                self.play_requested = false;
                self.set_state(TransportState::Playing);
            }
            Err(e) => self.fail(PlaybackError::PlaybackRejected(e.reason())),
        }
    }

    // ===== Seek =====

    /// Seek to an absolute position in seconds
    ///
    /// Clamped into `[0, duration]`. The position updates immediately and the
    /// transport state is unchanged. Before the duration is known the target is
    /// buffered and applied once the resource loads.
    pub fn seek(&mut self, target_secs: f64) {
        if !target_secs.is_finite() {
            debug!(target_secs, "Ignoring non-finite seek target");
            return;
        }

        if self.state == TransportState::Loading {
            self.pending_seek = Some(target_secs.max(0.0));
            return;
        }

        if self.resource.is_none() || self.duration_secs.is_none() {
            debug!(state = ?self.state, "Seek ignored, no timeline");
            return;
        }

        let position = self.clamp_position(target_secs);
        self.seek_resource(position);
        self.emit_position_update();
    }

    /// Move the resource and hold back its clock until it confirms
    fn seek_resource(&mut self, position: f64) {
        self.position_secs = position;
        if let Some(ref mut resource) = self.resource {
            resource.seek(position);
            self.unconfirmed_seek = Some(position);
        }
    }

    /// Seek relative to the current position
    pub fn skip(&mut self, delta_secs: f64) {
        if !delta_secs.is_finite() {
            return;
        }

        let base = match (self.state, self.pending_seek) {
            (TransportState::Loading, Some(pending)) => pending,
            _ => self.position_secs,
        };
        self.seek(base + delta_secs);
    }

    fn clamp_position(&self, secs: f64) -> f64 {
        match self.duration_secs {
            Some(duration) => secs.clamp(0.0, duration),
            None => secs.max(0.0),
        }
    }

    // ===== Output Settings =====

    /// Set volume (0.0-1.0)
    ///
    /// A level above zero also clears mute.
    pub fn set_volume(&mut self, level: f32) {
        if !level.is_finite() {
            debug!(level, "Ignoring non-finite volume");
            return;
        }

        let stored = self.volume.set_level(level);
        if stored > 0.0 && self.volume.is_muted() {
            self.volume.unmute();
        }
        self.apply_gain();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
    }

    fn apply_gain(&mut self) {
        let gain = self.volume.gain();
        if let Some(ref mut resource) = self.resource {
            resource.set_volume(gain);
        }
        self.pending_events.push(SessionEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    /// Advance to the next playback rate (1 → 1.25 → 1.5 → 1.75 → 2 → 1)
    pub fn cycle_playback_rate(&mut self) -> PlaybackRate {
        self.set_playback_rate(self.rate.next());
        self.rate
    }

    /// Set a specific playback rate
    pub fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
        if let Some(ref mut resource) = self.resource {
            resource.set_rate(rate.multiplier());
        }
        self.pending_events.push(SessionEvent::RateChanged { rate });
    }

    /// Toggle repeat; only affects what happens at the natural end
    pub fn toggle_repeat(&mut self) -> bool {
        self.set_repeat(!self.repeat);
        self.repeat
    }

    /// Set repeat
    pub fn set_repeat(&mut self, enabled: bool) {
        self.repeat = enabled;
        self.pending_events
            .push(SessionEvent::RepeatChanged { enabled });
    }

    // ===== Media Events =====

    /// Handle an event from the media resource
    ///
    /// Events tagged with anything but the current load are dropped, so a
    /// superseded or released resource can never mutate the session.
    pub fn handle_media_event(&mut self, load: LoadId, event: MediaEvent) {
        if load != self.load_id || self.resource.is_none() {
            debug!(%load, current = %self.load_id, ?event, "Dropping stale media event");
            return;
        }

        match event {
            MediaEvent::Loaded { duration_secs } => self.on_loaded(duration_secs),
            MediaEvent::TimeUpdate { position_secs } => self.on_time_update(position_secs),
            MediaEvent::Seeked { position_secs } => self.on_seeked(position_secs),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error { reason } => self.fail(PlaybackError::Acquisition(reason)),
        }
    }

    fn on_loaded(&mut self, duration_secs: f64) {
        self.duration_secs = duration_secs.is_finite().then(|| duration_secs.max(0.0));
        if let Some(duration_secs) = self.duration_secs {
            self.pending_events
                .push(SessionEvent::DurationChanged { duration_secs });
        }

        if self.state != TransportState::Loading {
            // Duration refined mid-playback
            self.position_secs = self.clamp_position(self.position_secs);
            return;
        }

        info!(duration_secs = ?self.duration_secs, "Source loaded");

        if let Some(target) = self.pending_seek.take() {
            let position = self.clamp_position(target);
            self.seek_resource(position);
        }

        self.set_state(TransportState::Paused);
        self.emit_position_update();

        if self.play_requested {
            self.start_output();
        }
    }

    fn on_time_update(&mut self, position_secs: f64) {
        if !position_secs.is_finite()
            || !matches!(self.state, TransportState::Playing | TransportState::Paused)
        {
            return;
        }
        if let Some(target) = self.unconfirmed_seek {
            debug!(position_secs, target, "Dropping clock sample from before seek");
            return;
        }

        self.position_secs = self.clamp_position(position_secs);
        self.emit_position_update();
    }

    fn on_seeked(&mut self, position_secs: f64) {
        // Only the latest seek releases the clock
        match self.unconfirmed_seek {
            Some(target) if (target - position_secs).abs() < SEEK_TOLERANCE_SECS => {
                self.unconfirmed_seek = None;
            }
            _ => debug!(position_secs, "Ignoring superseded seek completion"),
        }
    }

    fn on_ended(&mut self) {
        if self.unconfirmed_seek.is_some() {
            debug!("Dropping end reached before seek");
            return;
        }

        match self.state {
            TransportState::Playing => {}
            TransportState::Paused => {
                // Ended raced a pause: stay paused, rewound
                debug!("Reached end while paused");
                self.position_secs = 0.0;
                if let Some(ref mut resource) = self.resource {
                    resource.seek(0.0);
                }
                self.emit_position_update();
                return;
            }
            _ => return,
        }

        self.position_secs = 0.0;

        if self.repeat {
            debug!("Reached end, repeating");
            if let Some(ref mut resource) = self.resource {
                resource.seek(0.0);
            }
            self.emit_position_update();
            self.start_output();
        } else {
            info!("Reached end");
            self.play_requested = false;
            self.set_state(TransportState::Ended);
            self.emit_position_update();
        }
    }

    // ===== Failure =====

    fn fail(&mut self, error: PlaybackError) {
        warn!(
            error = %error,
            url = ?self.source.as_ref().map(|s| s.url.as_str()),
            "Playback session failed"
        );

        self.release_resource();
        self.play_requested = false;
        self.pending_seek = None;

        self.pending_events.push(SessionEvent::Error {
            message: error.reason(),
        });
        self.failure = Some(error);
        self.set_state(TransportState::Errored);
    }

    fn release_resource(&mut self) {
        self.unconfirmed_seek = None;
        if let Some(mut resource) = self.resource.take() {
            resource.pause();
            resource.release();
        }
    }

    // ===== State Queries =====

    /// Get current transport state
    pub fn get_state(&self) -> TransportState {
        self.state
    }

    /// Get loaded source
    pub fn get_source(&self) -> Option<&EpisodeSource> {
        self.source.as_ref()
    }

    /// Get current position in seconds
    pub fn get_position(&self) -> f64 {
        self.position_secs
    }

    /// Get duration in seconds, if known
    pub fn get_duration(&self) -> Option<f64> {
        self.duration_secs
    }

    /// Get stored volume level (0.0-1.0)
    pub fn get_volume(&self) -> f32 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Get playback rate
    pub fn get_playback_rate(&self) -> PlaybackRate {
        self.rate
    }

    /// Check if repeat is enabled
    pub fn get_repeat(&self) -> bool {
        self.repeat
    }

    /// Reason for the current `Errored` state
    pub fn get_failure(&self) -> Option<&PlaybackError> {
        self.failure.as_ref()
    }

    /// Id of the current acquisition
    pub fn get_load_id(&self) -> LoadId {
        self.load_id
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            source: self.source.clone(),
            position_secs: self.position_secs,
            duration_secs: self.duration_secs,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            rate: self.rate,
            repeat: self.repeat,
            failure: self.failure.as_ref().map(PlaybackError::reason),
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Transport state changed");
            self.state = state;
            self.pending_events.push(SessionEvent::StateChanged { state });
        }
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(SessionEvent::PositionUpdate {
            position_secs: self.position_secs,
            duration_secs: self.duration_secs,
        });
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release_resource();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ScriptedBackend;

    fn loaded_session(duration_secs: f64) -> (PlaybackSession, ScriptedBackend) {
        let backend = ScriptedBackend::new();
        let mut session = PlaybackSession::new(Box::new(backend.clone()), SessionConfig::default());
        session.load(EpisodeSource::from_url("ep1.mp3"), false);
        let load = session.get_load_id();
        session.handle_media_event(load, MediaEvent::Loaded { duration_secs });
        (session, backend)
    }

    #[test]
    fn create_session() {
        let session = PlaybackSession::new(Box::new(ScriptedBackend::new()), SessionConfig::default());
        assert_eq!(session.get_state(), TransportState::Idle);
        assert_eq!(session.get_volume(), 1.0);
        assert!(session.get_source().is_none());
        assert_eq!(session.get_duration(), None);
    }

    #[test]
    fn load_then_loaded_is_paused() {
        let (session, backend) = loaded_session(60.0);
        assert_eq!(session.get_state(), TransportState::Paused);
        assert_eq!(session.get_duration(), Some(60.0));
        assert_eq!(backend.acquired_urls(), vec!["ep1.mp3".to_string()]);
    }

    #[test]
    fn play_while_loading_is_deferred() {
        let backend = ScriptedBackend::new();
        let mut session = PlaybackSession::new(Box::new(backend.clone()), SessionConfig::default());
        session.load(EpisodeSource::from_url("ep1.mp3"), false);
        session.play();
        assert_eq!(session.get_state(), TransportState::Loading);
        assert_eq!(backend.play_calls(), 0);

        let load = session.get_load_id();
        session.handle_media_event(load, MediaEvent::Loaded { duration_secs: 10.0 });
        assert_eq!(session.get_state(), TransportState::Playing);
        assert_eq!(backend.play_calls(), 1);
    }

    #[test]
    fn pause_while_loading_cancels_deferred_play() {
        let backend = ScriptedBackend::new();
        let mut session = PlaybackSession::new(Box::new(backend.clone()), SessionConfig::default());
        session.load(EpisodeSource::from_url("ep1.mp3"), true);
        session.pause();

        let load = session.get_load_id();
        session.handle_media_event(load, MediaEvent::Loaded { duration_secs: 10.0 });
        assert_eq!(session.get_state(), TransportState::Paused);
        assert_eq!(backend.play_calls(), 0);
    }

    #[test]
    fn seek_clamps_and_keeps_state() {
        let (mut session, backend) = loaded_session(100.0);

        session.seek(150.0);
        assert_eq!(session.get_position(), 100.0);
        session.seek(-5.0);
        assert_eq!(session.get_position(), 0.0);
        session.seek(42.5);
        assert_eq!(session.get_position(), 42.5);

        assert_eq!(session.get_state(), TransportState::Paused);
        assert_eq!(backend.seeks(), vec![100.0, 0.0, 42.5]);
    }

    #[test]
    fn seek_before_duration_is_buffered() {
        let backend = ScriptedBackend::new();
        let mut session = PlaybackSession::new(Box::new(backend.clone()), SessionConfig::default());
        session.load(EpisodeSource::from_url("ep1.mp3"), false);
        session.seek(500.0);
        assert_eq!(session.get_position(), 0.0);

        let load = session.get_load_id();
        session.handle_media_event(load, MediaEvent::Loaded { duration_secs: 120.0 });
        assert_eq!(session.get_position(), 120.0);
        assert_eq!(backend.seeks(), vec![120.0]);
    }

    #[test]
    fn skip_is_relative_and_clamped() {
        let (mut session, _backend) = loaded_session(60.0);
        session.skip(30.0);
        assert_eq!(session.get_position(), 30.0);
        session.skip(-45.0);
        assert_eq!(session.get_position(), 0.0);
        session.skip(90.0);
        assert_eq!(session.get_position(), 60.0);
    }

    #[test]
    fn volume_while_muted_is_stored_not_audible() {
        let (mut session, backend) = loaded_session(60.0);
        session.set_volume(0.6);
        session.toggle_mute();
        assert_eq!(backend.last_gain(), Some(0.0));

        session.set_volume(0.0);
        assert!(session.is_muted());
        assert_eq!(session.get_volume(), 0.0);

        session.set_volume(0.4);
        assert!(!session.is_muted());
        assert_eq!(backend.last_gain(), Some(0.4));
    }

    #[test]
    fn rate_applies_to_resource() {
        let (mut session, backend) = loaded_session(60.0);
        assert_eq!(session.cycle_playback_rate(), PlaybackRate::X1_25);
        assert_eq!(backend.last_rate(), Some(1.25));
    }

    #[test]
    fn unload_returns_to_idle_and_releases() {
        let (mut session, backend) = loaded_session(60.0);
        let load = session.get_load_id();
        session.unload();

        assert_eq!(session.get_state(), TransportState::Idle);
        assert!(session.get_source().is_none());
        assert_eq!(backend.released(), 1);

        session.handle_media_event(load, MediaEvent::Ended);
        assert_eq!(session.get_state(), TransportState::Idle);
    }

    #[test]
    fn drop_releases_resource() {
        let (session, backend) = loaded_session(60.0);
        drop(session);
        assert_eq!(backend.released(), 1);
    }

    #[test]
    fn snapshot_reflects_failure() {
        let backend = ScriptedBackend::new();
        backend.fail_acquire("bad-url");
        let mut session = PlaybackSession::new(Box::new(backend), SessionConfig::default());
        session.load(EpisodeSource::from_url("bad-url"), false);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, TransportState::Errored);
        assert!(snapshot.failure.unwrap().contains("bad-url"));
    }

    #[test]
    fn apply_routes_commands() {
        let (mut session, _backend) = loaded_session(60.0);
        session.apply(SessionCommand::Play);
        assert_eq!(session.get_state(), TransportState::Playing);
        session.apply(SessionCommand::Seek(12.0));
        assert_eq!(session.get_position(), 12.0);
        session.apply(SessionCommand::ToggleRepeat);
        assert!(session.get_repeat());
        session.apply(SessionCommand::Pause);
        assert_eq!(session.get_state(), TransportState::Paused);
    }
}
