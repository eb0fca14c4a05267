//! Shared test helpers for playback session tests

#![allow(dead_code)]

use podcast_playback::{
    EpisodeSource, LoadId, MediaBackend, MediaEvent, MediaResource, PlaybackError, PlaybackSession,
    Result, SessionConfig,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything the session asked the fake to do
#[derive(Default)]
pub struct FakeLog {
    pub acquisitions: Vec<(String, LoadId)>,
    pub failing_urls: Vec<String>,
    pub reject_play: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seeks: Vec<f64>,
    pub gains: Vec<f32>,
    pub rates: Vec<f32>,
    pub released: Vec<LoadId>,
}

/// Backend that never produces events on its own
///
/// Tests synthesise `MediaEvent`s and feed them to the session with the
/// `LoadId` the fake recorded at acquisition.
#[derive(Clone, Default)]
pub struct FakeBackend {
    log: Arc<Mutex<FakeLog>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, FakeLog> {
        self.log.lock().unwrap()
    }

    /// Fail `acquire` synchronously for this URL
    pub fn fail_url(&self, url: &str) {
        self.log().failing_urls.push(url.to_string());
    }

    /// Make every `play` call on resources be declined
    pub fn reject_play(&self, reject: bool) {
        self.log().reject_play = reject;
    }

    /// Load id handed to the most recent acquisition of `url`
    pub fn load_for(&self, url: &str) -> LoadId {
        self.log()
            .acquisitions
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, load)| *load)
            .unwrap_or_else(|| panic!("{} was never acquired", url))
    }

    pub fn acquired_urls(&self) -> Vec<String> {
        self.log()
            .acquisitions
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

impl MediaBackend for FakeBackend {
    fn acquire(&mut self, url: &str, load: LoadId) -> Result<Box<dyn MediaResource>> {
        let mut log = self.log();
        log.acquisitions.push((url.to_string(), load));
        if log.failing_urls.iter().any(|u| u == url) {
            return Err(PlaybackError::acquisition(format!("404 fetching {}", url)));
        }
        Ok(Box::new(FakeResource {
            log: Arc::clone(&self.log),
            load,
        }))
    }
}

struct FakeResource {
    log: Arc<Mutex<FakeLog>>,
    load: LoadId,
}

impl MediaResource for FakeResource {
    fn play(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.play_calls += 1;
        if log.reject_play {
            return Err(PlaybackError::rejected("not allowed to play"));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().pause_calls += 1;
    }

    fn seek(&mut self, position_secs: f64) {
        self.log.lock().unwrap().seeks.push(position_secs);
    }

    fn set_volume(&mut self, gain: f32) {
        self.log.lock().unwrap().gains.push(gain);
    }

    fn set_rate(&mut self, rate: f32) {
        self.log.lock().unwrap().rates.push(rate);
    }

    fn release(&mut self) {
        self.log.lock().unwrap().released.push(self.load);
    }
}

pub fn new_session() -> (PlaybackSession, FakeBackend) {
    let backend = FakeBackend::new();
    let session = PlaybackSession::new(Box::new(backend.clone()), SessionConfig::default());
    (session, backend)
}

/// Session with `url` loaded and paused at 0
pub fn loaded_session(url: &str, duration_secs: f64) -> (PlaybackSession, FakeBackend) {
    let (mut session, backend) = new_session();
    session.load(EpisodeSource::from_url(url), false);
    session.handle_media_event(backend.load_for(url), MediaEvent::Loaded { duration_secs });
    session.drain_events();
    (session, backend)
}
