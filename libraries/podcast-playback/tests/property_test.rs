//! Property-based tests for the playback session
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::{loaded_session, new_session};
use podcast_playback::{EpisodeSource, MediaEvent, PlaybackRate, SessionCommand, TransportState};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_command() -> impl Strategy<Value = SessionCommand> {
    prop_oneof![
        Just(SessionCommand::Play),
        Just(SessionCommand::Pause),
        (-100.0f64..1000.0).prop_map(SessionCommand::Seek),
        (-300.0f64..300.0).prop_map(SessionCommand::Skip),
        (0.0f32..=1.0).prop_map(SessionCommand::SetVolume),
        Just(SessionCommand::ToggleMute),
        Just(SessionCommand::CyclePlaybackRate),
        Just(SessionCommand::ToggleRepeat),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: stored volume reads back exactly; a positive level unmutes
    #[test]
    fn volume_reads_back(level in 0.0f32..=1.0, muted_first in any::<bool>()) {
        let (mut session, _backend) = loaded_session("ep1.mp3", 300.0);
        if muted_first {
            session.toggle_mute();
        }

        session.set_volume(level);

        prop_assert_eq!(session.get_volume(), level);
        if level > 0.0 {
            prop_assert!(!session.is_muted());
        }
    }

    /// Property: seek lands on the target clamped into [0, duration]
    #[test]
    fn seek_is_clamped(duration in 1.0f64..10_000.0, target in -20_000.0f64..20_000.0) {
        let (mut session, _backend) = loaded_session("ep1.mp3", duration);

        session.seek(target);

        prop_assert_eq!(session.get_position(), target.clamp(0.0, duration));
        prop_assert_eq!(session.get_state(), TransportState::Paused);
    }

    /// Property: five cycles always come back to the starting rate
    #[test]
    fn rate_cycle_has_length_five(start in 0usize..5) {
        let (mut session, _backend) = new_session();
        let start = PlaybackRate::ALL[start];
        session.set_playback_rate(start);

        for step in 1..5 {
            prop_assert_ne!(session.cycle_playback_rate(), start, "returned early at step {}", step);
        }
        prop_assert_eq!(session.cycle_playback_rate(), start);
    }

    /// Property: mute toggled twice is the identity
    #[test]
    fn double_mute_is_identity(level in 0.0f32..=1.0, muted in any::<bool>()) {
        let (mut session, _backend) = new_session();
        session.set_volume(level);
        if muted {
            session.toggle_mute();
        }
        let before = (session.get_volume(), session.is_muted());

        session.toggle_mute();
        session.toggle_mute();

        prop_assert_eq!((session.get_volume(), session.is_muted()), before);
    }

    /// Property: position stays within [0, duration] under any command sequence
    #[test]
    fn position_stays_in_range(
        duration in 1.0f64..600.0,
        commands in prop::collection::vec(arbitrary_command(), 1..40),
        samples in prop::collection::vec(-50.0f64..700.0, 0..20)
    ) {
        let (mut session, backend) = loaded_session("ep1.mp3", duration);
        let load = backend.load_for("ep1.mp3");

        for (i, command) in commands.into_iter().enumerate() {
            session.apply(command);
            if let Some(&position_secs) = samples.get(i) {
                session.handle_media_event(load, MediaEvent::TimeUpdate { position_secs });
            }

            let position = session.get_position();
            prop_assert!(position >= 0.0 && position <= duration, "position {} out of range", position);
            prop_assert_ne!(session.get_state(), TransportState::Errored);
        }
    }

    /// Property: only the last of several rapid loads is ever observed
    #[test]
    fn last_load_wins(count in 2usize..8, winner_duration in 1.0f64..600.0) {
        let (mut session, backend) = new_session();
        let urls: Vec<String> = (0..count).map(|i| format!("ep{}.mp3", i)).collect();
        for url in &urls {
            session.load(EpisodeSource::from_url(url.as_str()), false);
        }

        // Completions arrive in arbitrary order; stale ones are dropped
        for url in urls.iter().rev() {
            let duration_secs = if url == &urls[count - 1] { winner_duration } else { 1.0 };
            session.handle_media_event(backend.load_for(url), MediaEvent::Loaded { duration_secs });
        }

        prop_assert_eq!(session.get_source().map(|s| s.url.clone()), Some(urls[count - 1].clone()));
        prop_assert_eq!(session.get_duration(), Some(winner_duration));
        prop_assert_eq!(backend.log().released.len(), count - 1);
    }
}
