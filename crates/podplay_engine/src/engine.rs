use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_info};
use tokio_util::sync::CancellationToken;

use crate::feed::load_podcast;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::search::{SearchClient, SearchSettings};
use crate::{system_clock, Clock, EngineEvent};

#[derive(Clone)]
pub struct EngineConfig {
    pub feed: FetchSettings,
    pub search: SearchSettings,
    pub clock: Clock,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feed: FetchSettings::default(),
            search: SearchSettings::default(),
            clock: system_clock(),
        }
    }
}

/// Receives engine completions. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Search { term: String },
    Preview { key: String },
    CancelPreview { key: String },
    LoadDetails { key: String, image_url: String },
}

struct Services {
    feeds: Arc<dyn Fetcher>,
    search: SearchClient,
    clock: Clock,
    sink: Arc<dyn EventSink>,
}

/// Handle to the background IO thread. Commands never block the caller.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Self {
        let feeds: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(config.feed.clone()));
        let search = SearchClient::new(config.search.clone());
        Self::with_services(Services {
            feeds,
            search,
            clock: config.clock,
            sink,
        })
    }

    /// Build a handle over caller-provided fetchers, mainly for tests.
    pub fn with_fetchers(
        config: EngineConfig,
        feeds: Arc<dyn Fetcher>,
        search: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let search = SearchClient::with_fetcher(config.search.clone(), search);
        Self::with_services(Services {
            feeds,
            search,
            clock: config.clock,
            sink,
        })
    }

    fn with_services(services: Services) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let services = Arc::new(services);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut preview: Option<(String, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Preview { key } => {
                        if let Some((previous, token)) = preview.take() {
                            engine_debug!("Cancelling preview fetch for {}", previous);
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        preview = Some((key.clone(), token.clone()));
                        runtime.spawn(run_preview(services.clone(), key, token));
                    }
                    EngineCommand::CancelPreview { key } => {
                        if preview.as_ref().is_some_and(|(active, _)| *active == key) {
                            if let Some((_, token)) = preview.take() {
                                engine_debug!("Cancelling preview fetch for {}", key);
                                token.cancel();
                            }
                        }
                    }
                    EngineCommand::Search { term } => {
                        runtime.spawn(run_search(services.clone(), term));
                    }
                    EngineCommand::LoadDetails { key, image_url } => {
                        runtime.spawn(run_details(services.clone(), key, image_url));
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    pub fn search(&self, term: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search { term: term.into() });
    }

    /// Resolve the first playable episode of `key`, superseding any preview in flight.
    pub fn preview(&self, key: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Preview { key: key.into() });
    }

    pub fn cancel_preview(&self, key: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::CancelPreview { key: key.into() });
    }

    /// Load the full podcast for `key`. Feeds are not read for artwork, so the
    /// caller passes the search row's `image_url`.
    pub fn load_details(&self, key: impl Into<String>, image_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::LoadDetails {
            key: key.into(),
            image_url: image_url.into(),
        });
    }
}

async fn run_preview(services: Arc<Services>, key: String, token: CancellationToken) {
    let loaded = tokio::select! {
        _ = token.cancelled() => {
            engine_debug!("Preview fetch for {} cancelled", key);
            return;
        }
        podcast = load_podcast(services.feeds.as_ref(), &key, services.clock.clone()) => podcast,
    };

    let event = match loaded {
        Some(podcast) => {
            let media_url = podcast.first_playable_media().unwrap_or_default().to_string();
            engine_info!(
                "Preview resolved for {} (playable: {})",
                key,
                !media_url.is_empty()
            );
            EngineEvent::PreviewResolved { key, media_url }
        }
        None => EngineEvent::PreviewFailed { key },
    };
    services.sink.emit(event);
}

async fn run_search(services: Arc<Services>, term: String) {
    let result = services.search.search(&term).await;
    services
        .sink
        .emit(EngineEvent::SearchCompleted { term, result });
}

async fn run_details(services: Arc<Services>, key: String, image_url: String) {
    let podcast = load_podcast(services.feeds.as_ref(), &key, services.clock.clone())
        .await
        .map(|podcast| podcast.with_image_url(image_url));
    services
        .sink
        .emit(EngineEvent::DetailsLoaded { key, podcast });
}
