//! Headless playback driver
//!
//! Runs one episode through a `SessionHost` backed by the clock-only
//! `HeadlessBackend`, advancing simulated time once per tick.

use crate::error::{CliError, Result};
use podcast_playback::{
    EpisodeSource, HeadlessBackend, SessionCommand, SessionConfig, SessionHost, SessionSnapshot,
    TransportState,
};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    /// Simulated time per tick
    pub tick: Duration,
    /// Stop (paused) after this much simulated time
    pub limit: Option<Duration>,
}

/// Play `source` until it ends, fails, or the time limit is reached
///
/// `on_update` sees every distinct snapshot the session publishes (sampled
/// once per tick). Returns the final snapshot.
pub async fn play_headless<F>(
    source: EpisodeSource,
    duration: Duration,
    session: SessionConfig,
    options: PlayOptions,
    mut on_update: F,
) -> Result<SessionSnapshot>
where
    F: FnMut(&SessionSnapshot),
{
    let (backend, notifications) = HeadlessBackend::new();
    backend.register(source.url.clone(), duration);

    let host = SessionHost::new(Box::new(backend.clone()), session);
    let player = host.handle();
    let mut updates = player.subscribe();

    info!(url = %source.url, duration_secs = duration.as_secs_f64(), "Starting headless playback");
    player.dispatch(SessionCommand::Load {
        source,
        autoplay: true,
    });

    let mut ticker = interval(options.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut elapsed = Duration::ZERO;

    loop {
        player.deliver_all(notifications.try_iter());
        if updates.has_changed().unwrap_or(false) {
            let snapshot = updates.borrow_and_update().clone();
            on_update(&snapshot);
        }

        let snapshot = player.snapshot();
        match snapshot.state {
            TransportState::Ended => break,
            TransportState::Errored => {
                return Err(CliError::Playback(
                    snapshot
                        .failure
                        .unwrap_or_else(|| "unknown failure".to_string()),
                ));
            }
            _ => {}
        }

        if options.limit.is_some_and(|limit| elapsed >= limit) {
            debug!(elapsed_secs = elapsed.as_secs_f64(), "Time limit reached");
            player.dispatch(SessionCommand::Pause);
            if updates.has_changed().unwrap_or(false) {
                let snapshot = updates.borrow_and_update().clone();
                on_update(&snapshot);
            }
            break;
        }

        ticker.tick().await;
        backend.tick(options.tick);
        elapsed += options.tick;
    }

    let last = player.snapshot();
    host.shutdown();
    Ok(last)
}
