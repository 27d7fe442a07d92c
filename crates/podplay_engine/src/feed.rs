use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_warn};

use crate::date::normalize_date_with;
use crate::fetch::Fetcher;
use crate::markup::parse_document;
use crate::walker::{walk_feed, EpisodeDraft, FeedDraft};
use crate::{Clock, FeedError, FetchError, FetchOutput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// May be empty, and is not guaranteed unique within a feed.
    pub guid: String,
    pub title: String,
    pub description: String,
    /// Empty when the item has no enclosure.
    pub media_url: String,
    pub mime_type: String,
    pub duration_text: String,
    pub released: DateTime<Utc>,
}

impl Episode {
    pub fn is_playable(&self) -> bool {
        !self.media_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
    /// The URL the feed was requested from, not anything the document claims.
    pub feed_url: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub last_updated: DateTime<Utc>,
    /// Document order of the channel's `item` elements.
    pub episodes: Vec<Episode>,
}

impl Podcast {
    /// Trimmed media URL of the first playable episode.
    pub fn first_playable_media(&self) -> Option<&str> {
        self.episodes
            .iter()
            .find(|episode| episode.is_playable())
            .map(|episode| episode.media_url.trim())
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// Parse feed bytes into a [`Podcast`], keeping the failure reason.
pub fn parse_feed(
    feed_url: &str,
    bytes: &[u8],
    now: &dyn Fn() -> DateTime<Utc>,
) -> Result<Podcast, FeedError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FeedError::Empty);
    }
    let root = parse_document(bytes)?;
    let draft = walk_feed(&root, now);
    Ok(finalize(feed_url, draft, now))
}

/// Turn a fetch result into a podcast. Transport failures, blank payloads and
/// malformed markup all collapse to `None`.
pub fn assemble(
    feed_url: &str,
    fetched: Result<FetchOutput, FetchError>,
    now: &dyn Fn() -> DateTime<Utc>,
) -> Option<Podcast> {
    let result = fetched
        .map_err(|err| FeedError::Fetch(err.kind))
        .and_then(|output| parse_feed(feed_url, &output.bytes, now));
    match result {
        Ok(podcast) => {
            engine_debug!(
                "Assembled feed {} with {} episodes",
                feed_url,
                podcast.episodes.len()
            );
            Some(podcast)
        }
        Err(err) => {
            engine_warn!("Feed {} unavailable: {}", feed_url, err);
            None
        }
    }
}

/// Fetch and assemble a feed; parsing runs on the blocking pool.
pub async fn load_podcast(fetcher: &dyn Fetcher, feed_url: &str, clock: Clock) -> Option<Podcast> {
    let fetched = fetcher.fetch(feed_url).await;
    let feed_url = feed_url.to_string();
    tokio::task::spawn_blocking(move || assemble(&feed_url, fetched, clock.as_ref()))
        .await
        .ok()
        .flatten()
}

fn finalize(feed_url: &str, draft: FeedDraft, now: &dyn Fn() -> DateTime<Utc>) -> Podcast {
    let episodes = draft
        .episodes
        .into_iter()
        .map(|episode| finalize_episode(episode, now))
        .collect();
    Podcast {
        feed_url: feed_url.to_string(),
        title: draft.title.unwrap_or_default(),
        description: draft.description.unwrap_or_default(),
        image_url: String::new(),
        last_updated: draft.last_updated.unwrap_or_else(now),
        episodes,
    }
}

fn finalize_episode(draft: EpisodeDraft, now: &dyn Fn() -> DateTime<Utc>) -> Episode {
    Episode {
        released: normalize_date_with(draft.pub_date.as_deref(), now),
        guid: draft.guid.unwrap_or_default(),
        title: draft.title.unwrap_or_default(),
        description: draft.description.unwrap_or_default(),
        media_url: draft.url.unwrap_or_default(),
        mime_type: draft.mime_type.unwrap_or_default(),
        duration_text: draft.duration.unwrap_or_default(),
    }
}
