use std::fmt::Write as _;

use podplay_core::{AppViewModel, EpisodeListView, Notice, Playback, PreviewState, ResultRowView};

const MAX_EPISODES_SHOWN: usize = 20;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));

    if view.rows.is_empty() && view.query.is_some() && !view.searching {
        let _ = writeln!(out, "  (no results)");
    }
    for row in &view.rows {
        let _ = writeln!(out, "{}", row_line(row));
    }

    if let Some(details) = &view.details {
        out.push_str(&render_details(details));
    }
    out
}

fn status_line(view: &AppViewModel) -> String {
    let query = match (&view.query, view.searching) {
        (Some(term), true) => format!("Searching '{}'...", term),
        (Some(term), false) => format!("Results for '{}': {}", term, view.rows.len()),
        (None, _) => "No search".to_string(),
    };
    let playback = match &view.playback {
        Playback::Idle => "idle".to_string(),
        Playback::Loading { key } => format!("loading {}", key),
        Playback::Playing { key } => format!("playing {}", key),
        Playback::Paused { key } => format!("paused {}", key),
    };
    format!("{} | preview: {}", query, playback)
}

fn preview_marker(state: PreviewState) -> &'static str {
    match state {
        PreviewState::Idle => "[ ]",
        PreviewState::Loading => "[~]",
        PreviewState::Playing => "[>]",
        PreviewState::Paused => "[=]",
    }
}

fn row_line(row: &ResultRowView) -> String {
    let subscribed = if row.subscribed { "*" } else { " " };
    let mut line = format!(
        "{:>3}. {} {} {}",
        row.index + 1,
        preview_marker(row.preview),
        subscribed,
        row.name
    );
    if !row.author.is_empty() {
        let _ = write!(line, " - {}", row.author);
    }
    line
}

fn render_details(details: &EpisodeListView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ({} episodes)", details.title, details.episodes.len());
    if !details.image_url.is_empty() {
        let _ = writeln!(out, "   artwork: {}", details.image_url);
    }
    for episode in details.episodes.iter().take(MAX_EPISODES_SHOWN) {
        let playable = if episode.is_playable() { " " } else { "x" };
        let _ = write!(
            out,
            "   {} {} {}",
            playable,
            episode.released.format("%Y-%m-%d"),
            episode.title
        );
        if !episode.duration_text.is_empty() {
            let _ = write!(out, " ({})", episode.duration_text);
        }
        out.push('\n');
    }
    if details.episodes.len() > MAX_EPISODES_SHOWN {
        let _ = writeln!(
            out,
            "   ... {} more",
            details.episodes.len() - MAX_EPISODES_SHOWN
        );
    }
    out
}

pub fn render_subscriptions(view: &AppViewModel) -> String {
    if view.subscriptions.is_empty() {
        return "No subscriptions\n".to_string();
    }
    let mut out = String::new();
    for key in &view.subscriptions {
        let _ = writeln!(out, " * {}", key);
    }
    out
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Busy => "Please wait, another preview is loading".to_string(),
        Notice::MissingFeedUrl => "This podcast has no feed URL".to_string(),
        Notice::NoPlayableEpisode => "No playable episode in this feed".to_string(),
        Notice::LoadError => "Could not load the feed".to_string(),
        Notice::PlaybackError { code } => format!("Playback failed ({})", code),
        Notice::SearchFailed => "Search failed".to_string(),
    }
}
