//! Plain-text rendering of catalog records and playback progress

use podcast_client::ResolvedEpisode;
use podcast_core::{format_clock, Episode, Series};
use podcast_playback::{SessionSnapshot, TransportState};

pub fn series_line(series: &Series) -> String {
    match &series.author {
        Some(author) => format!("{}  {} (by {})", series.id, series.title, author),
        None => format!("{}  {}", series.id, series.title),
    }
}

pub fn episode_line(episode: &Episode) -> String {
    let number = episode
        .episode_number
        .map(|n| format!("#{} ", n))
        .unwrap_or_default();
    let duration = episode.duration_label().unwrap_or_else(|| "--:--".to_string());
    format!("{}  {}{}  [{}]", episode.id, number, episode.title, duration)
}

pub fn resolved_lines(resolved: &ResolvedEpisode) -> Vec<String> {
    let mut lines = vec![format!("title:  {}", resolved.episode.title)];
    if let Some(series) = &resolved.series_title {
        lines.push(format!("series: {}", series));
    }
    lines.push(format!("audio:  {}", resolved.audio_url));
    if let Some(cover) = &resolved.cover_url {
        lines.push(format!("cover:  {}", cover));
    }
    lines
}

/// One status line for a session snapshot
pub fn progress_line(snapshot: &SessionSnapshot) -> String {
    let state = match snapshot.state {
        TransportState::Idle => "idle",
        TransportState::Loading => "loading",
        TransportState::Playing => "playing",
        TransportState::Paused => "paused",
        TransportState::Ended => "ended",
        TransportState::Errored => "error",
    };
    let total = snapshot
        .duration_secs
        .map(format_clock)
        .unwrap_or_else(|| "--:--".to_string());

    let mut line = format!(
        "[{:>7}] {} / {}  {}",
        state,
        format_clock(snapshot.position_secs),
        total,
        snapshot.rate
    );
    if snapshot.muted {
        line.push_str("  muted");
    }
    if snapshot.repeat {
        line.push_str("  repeat");
    }
    if let Some(failure) = &snapshot.failure {
        line.push_str(&format!("  ({})", failure));
    }
    line
}
