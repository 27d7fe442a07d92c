use crate::{EpisodeListView, FeedKey, ResultRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a search term.
    SearchSubmitted(String),
    /// Search index answered for `term`.
    SearchCompleted { term: String, rows: Vec<ResultRow> },
    SearchFailed { term: String },
    /// User cleared the result list.
    ResultsCleared,
    /// User pressed play on a result row.
    PreviewSelected { key: FeedKey },
    /// Feed for `key` parsed; `media_url` is empty when nothing is playable.
    PreviewResolved { key: FeedKey, media_url: String },
    PreviewFailed { key: FeedKey },
    /// Audio engine started or stopped producing sound.
    PlaybackStateChanged { is_playing: bool },
    PlaybackError { code: String },
    /// User asked to stop the preview.
    StopClicked,
    /// User opened a feed's episode list; `image_url` is the artwork from its result row.
    DetailsRequested { key: FeedKey, image_url: String },
    DetailsLoaded {
        key: FeedKey,
        details: Option<EpisodeListView>,
    },
    SubscriptionToggled { key: FeedKey },
    /// Restore subscriptions read from disk.
    RestoreSubscriptions(Vec<FeedKey>),
    Tick,
    NoOp,
}
