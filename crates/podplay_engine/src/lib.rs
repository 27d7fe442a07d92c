//! Podplay engine: feed parsing, search and the background IO thread.
mod date;
mod engine;
mod feed;
mod fetch;
mod markup;
mod persist;
mod search;
mod types;
mod walker;

pub use date::{normalize_date, normalize_date_with};
pub use engine::{ChannelEventSink, EngineConfig, EngineHandle, EventSink};
pub use feed::{assemble, load_podcast, parse_feed, Episode, Podcast};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use markup::{parse_document, Child, Node};
pub use persist::{ensure_data_dir, read_optional, AtomicFileWriter, PersistError};
pub use search::{
    filter_summaries, map_hit, map_hits, PodcastSummary, RawHit, SearchClient, SearchSettings,
    TitleFilter, DEFAULT_SEARCH_URL, FALLBACK_TITLE,
};
pub use types::{
    system_clock, Clock, EngineEvent, FailureKind, FeedError, FetchError, FetchMetadata,
    FetchOutput, SearchError,
};
pub use walker::{walk_feed, EpisodeDraft, FeedDraft};
