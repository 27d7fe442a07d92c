use chrono::{DateTime, Utc};

use crate::{FeedKey, Playback};

/// What a result row's play affordance should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: Option<String>,
    pub searching: bool,
    pub rows: Vec<ResultRowView>,
    pub playback: Playback,
    pub subscriptions: Vec<FeedKey>,
    pub details: Option<EpisodeListView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub index: usize,
    pub key: FeedKey,
    pub name: String,
    pub author: String,
    pub image_url: String,
    pub open_url: String,
    pub raw_release_date: String,
    pub preview: PreviewState,
    pub subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeListView {
    pub key: FeedKey,
    pub title: String,
    pub description: String,
    /// Artwork carried over from the search row; the feed itself never sets it.
    pub image_url: String,
    pub episodes: Vec<EpisodeRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRowView {
    pub title: String,
    pub released: DateTime<Utc>,
    pub duration_text: String,
    pub media_url: String,
}

impl EpisodeRowView {
    pub fn is_playable(&self) -> bool {
        !self.media_url.trim().is_empty()
    }
}
