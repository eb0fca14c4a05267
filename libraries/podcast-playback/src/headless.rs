//! Headless media backend
//!
//! Models the playback clock of a resource without producing audio. Durations
//! are registered per URL up front; time only moves when `tick` is called, so
//! callers (the CLI, tests) decide how fast simulated time runs.

use crate::{
    error::{PlaybackError, Result},
    resource::{MediaBackend, MediaEvent, MediaNotification, MediaResource},
    types::LoadId,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Clock for the one live resource
#[derive(Debug, Clone)]
struct Clock {
    load: LoadId,
    duration_secs: f64,
    position_secs: f64,
    playing: bool,
    rate: f32,
    gain: f32,
}

#[derive(Default)]
struct State {
    durations: HashMap<String, f64>,
    blocked: bool,
    active: Option<Clock>,
}

/// Clock-only media backend
///
/// Notifications are queued on a channel; drain it and hand them to the
/// session (`SessionHandle::deliver_all`).
#[derive(Clone)]
pub struct HeadlessBackend {
    state: Arc<Mutex<State>>,
    tx: Sender<MediaNotification>,
}

impl HeadlessBackend {
    /// Create the backend and the receiver for its notifications
    pub fn new() -> (Self, Receiver<MediaNotification>) {
        let (tx, rx) = unbounded();
        (
            Self {
                state: Arc::new(Mutex::new(State::default())),
                tx,
            },
            rx,
        )
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `url` loadable with the given duration
    pub fn register(&self, url: impl Into<String>, duration: Duration) {
        self.lock()
            .durations
            .insert(url.into(), duration.as_secs_f64());
    }

    /// Refuse to start output, like an environment without a user gesture
    pub fn set_playback_blocked(&self, blocked: bool) {
        self.lock().blocked = blocked;
    }

    /// Advance the clock of the playing resource by `elapsed` wall time
    ///
    /// Scaled by the playback rate. Queues a `TimeUpdate`, and `Ended` when
    /// the end is reached.
    pub fn tick(&self, elapsed: Duration) {
        let mut state = self.lock();
        let Some(clock) = state.active.as_mut() else {
            return;
        };
        if !clock.playing {
            return;
        }

        clock.position_secs += elapsed.as_secs_f64() * f64::from(clock.rate);
        let load = clock.load;

        if clock.position_secs >= clock.duration_secs {
            clock.position_secs = clock.duration_secs;
            clock.playing = false;
            let position_secs = clock.position_secs;
            drop(state);
            self.notify(load, MediaEvent::TimeUpdate { position_secs });
            self.notify(load, MediaEvent::Ended);
        } else {
            let position_secs = clock.position_secs;
            drop(state);
            self.notify(load, MediaEvent::TimeUpdate { position_secs });
        }
    }

    /// Position of the live resource's clock
    pub fn position(&self) -> Option<Duration> {
        self.lock()
            .active
            .as_ref()
            .map(|clock| Duration::from_secs_f64(clock.position_secs))
    }

    /// Whether the live resource is outputting
    pub fn is_playing(&self) -> bool {
        self.lock().active.as_ref().is_some_and(|clock| clock.playing)
    }

    /// Audible gain of the live resource
    pub fn gain(&self) -> Option<f32> {
        self.lock().active.as_ref().map(|clock| clock.gain)
    }

    fn notify(&self, load: LoadId, event: MediaEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(MediaNotification { load, event });
    }
}

impl MediaBackend for HeadlessBackend {
    fn acquire(&mut self, url: &str, load: LoadId) -> Result<Box<dyn MediaResource>> {
        if url.trim().is_empty() {
            return Err(PlaybackError::acquisition("empty URL"));
        }

        let duration = self.lock().durations.get(url).copied();
        match duration {
            Some(duration_secs) => {
                debug!(url, %load, duration_secs, "Headless resource acquired");
                self.lock().active = Some(Clock {
                    load,
                    duration_secs,
                    position_secs: 0.0,
                    playing: false,
                    rate: 1.0,
                    gain: 1.0,
                });
                self.notify(load, MediaEvent::Loaded { duration_secs });
            }
            None => {
                debug!(url, %load, "Headless resource not found");
                self.notify(
                    load,
                    MediaEvent::Error {
                        reason: format!("no media registered for {}", url),
                    },
                );
            }
        }

        Ok(Box::new(HeadlessResource {
            backend: self.clone(),
            load,
        }))
    }
}

/// Handle to a headless resource
struct HeadlessResource {
    backend: HeadlessBackend,
    load: LoadId,
}

impl HeadlessResource {
    fn with_clock(&self, f: impl FnOnce(&mut Clock)) {
        let mut state = self.backend.lock();
        if let Some(clock) = state.active.as_mut().filter(|c| c.load == self.load) {
            f(clock);
        }
    }
}

impl MediaResource for HeadlessResource {
    fn play(&mut self) -> Result<()> {
        if self.backend.lock().blocked {
            return Err(PlaybackError::rejected("playback blocked by environment"));
        }
        self.with_clock(|clock| {
            if clock.position_secs >= clock.duration_secs {
                clock.position_secs = 0.0;
            }
            clock.playing = true;
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.with_clock(|clock| clock.playing = false);
    }

    fn seek(&mut self, position_secs: f64) {
        let mut landed = None;
        self.with_clock(|clock| {
            clock.position_secs = position_secs.clamp(0.0, clock.duration_secs);
            landed = Some(clock.position_secs);
        });
        if let Some(position_secs) = landed {
            self.backend
                .notify(self.load, MediaEvent::Seeked { position_secs });
        }
    }

    fn set_volume(&mut self, gain: f32) {
        self.with_clock(|clock| clock.gain = gain);
    }

    fn set_rate(&mut self, rate: f32) {
        self.with_clock(|clock| clock.rate = rate);
    }

    fn release(&mut self) {
        let mut state = self.backend.lock();
        if state.active.as_ref().is_some_and(|c| c.load == self.load) {
            state.active = None;
        }
    }
}
