use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use serde::Deserialize;
use url::Url;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{FailureKind, SearchError};

pub const DEFAULT_SEARCH_URL: &str = "https://itunes.apple.com/search";
pub const FALLBACK_TITLE: &str = "Podcast";

/// One record from the search index, exactly as the index reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHit {
    pub collection_censored_name: Option<String>,
    pub collection_name: Option<String>,
    pub artist_name: Option<String>,
    pub feed_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub release_date: Option<String>,
    pub artwork_url30: Option<String>,
    pub artwork_url60: Option<String>,
    pub artwork_url100: Option<String>,
    pub artwork_url600: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchResponse {
    result_count: u32,
    results: Vec<RawHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastSummary {
    pub name: String,
    pub author: String,
    pub image_url: String,
    pub feed_url: String,
    /// Human-navigable page for the podcast.
    pub open_url: String,
    pub raw_release_date: String,
}

/// Keeps summaries whose title has at least `min_words` whitespace-separated words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFilter {
    pub min_words: usize,
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self { min_words: 3 }
    }
}

impl TitleFilter {
    pub fn disabled() -> Self {
        Self { min_words: 0 }
    }

    pub fn accepts(&self, summary: &PodcastSummary) -> bool {
        word_count(&summary.name) >= self.min_words
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn map_hits(hits: &[RawHit]) -> Vec<PodcastSummary> {
    hits.iter().map(map_hit).collect()
}

pub fn map_hit(hit: &RawHit) -> PodcastSummary {
    let name = first_non_empty(&[&hit.collection_censored_name, &hit.collection_name])
        .unwrap_or(FALLBACK_TITLE);
    let image_url = first_non_empty(&[
        &hit.artwork_url100,
        &hit.artwork_url60,
        &hit.artwork_url30,
        &hit.artwork_url600,
    ])
    .unwrap_or_default();

    PodcastSummary {
        name: name.to_string(),
        author: hit.artist_name.clone().unwrap_or_default(),
        image_url: image_url.to_string(),
        feed_url: hit.feed_url.clone().unwrap_or_default(),
        open_url: hit.collection_view_url.clone().unwrap_or_default(),
        raw_release_date: hit.release_date.clone().unwrap_or_default(),
    }
}

/// Stable filter over mapped summaries.
pub fn filter_summaries<F>(summaries: Vec<PodcastSummary>, keep: F) -> Vec<PodcastSummary>
where
    F: Fn(&PodcastSummary) -> bool,
{
    summaries.into_iter().filter(|summary| keep(summary)).collect()
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .find(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    pub media: String,
    pub limit: Option<u32>,
    pub title_filter: TitleFilter,
    pub fetch: FetchSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            media: "podcast".to_string(),
            limit: None,
            title_filter: TitleFilter::default(),
            fetch: FetchSettings::for_search(),
        }
    }
}

pub struct SearchClient {
    fetcher: Arc<dyn Fetcher>,
    settings: SearchSettings,
}

impl SearchClient {
    pub fn new(settings: SearchSettings) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone()));
        Self { fetcher, settings }
    }

    pub fn with_fetcher(settings: SearchSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher, settings }
    }

    /// Query the index. A blank term returns no results without a request.
    pub async fn search(&self, term: &str) -> Result<Vec<PodcastSummary>, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.request_url(term)?;
        engine_info!("Searching term='{}'", term);
        let output = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|err| SearchError::Fetch(err.kind))?;
        let response: SearchResponse = serde_json::from_slice(&output.bytes)
            .map_err(|err| SearchError::Decode(err.to_string()))?;
        engine_debug!(
            "Search returned {} hits (reported {})",
            response.results.len(),
            response.result_count
        );

        let filter = self.settings.title_filter;
        let summaries = filter_summaries(map_hits(&response.results), |summary| {
            filter.accepts(summary)
        });
        engine_debug!(
            "{} summaries left after title filter (min words {})",
            summaries.len(),
            filter.min_words
        );
        Ok(summaries)
    }

    fn request_url(&self, term: &str) -> Result<Url, SearchError> {
        let mut params = vec![
            ("term", term.to_string()),
            ("media", self.settings.media.clone()),
        ];
        if let Some(limit) = self.settings.limit {
            params.push(("limit", limit.to_string()));
        }
        Url::parse_with_params(&self.settings.base_url, &params)
            .map_err(|_| SearchError::Fetch(FailureKind::InvalidUrl))
    }
}
