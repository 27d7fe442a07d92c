use crate::FeedKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Search { term: String },
    /// Fetch the feed for `key` and report its first playable episode.
    FetchPreview { key: FeedKey },
    CancelPreview { key: FeedKey },
    StartPlayback { key: FeedKey, media_url: String },
    PausePlayback,
    ResumePlayback,
    StopPlayback,
    LoadDetails { key: FeedKey, image_url: String },
    SaveSubscriptions(Vec<FeedKey>),
    Notify(Notice),
}

/// User-facing signals the rendering layer shows once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Another preview is still loading.
    Busy,
    MissingFeedUrl,
    NoPlayableEpisode,
    LoadError,
    PlaybackError { code: String },
    SearchFailed,
}
