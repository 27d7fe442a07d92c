use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use engine_logging::{engine_debug, engine_info, engine_warn};
use podplay_core::{Effect, EpisodeListView, EpisodeRowView, Msg, Notice, ResultRow};
use podplay_engine::{EngineConfig, EngineEvent, EngineHandle, EventSink, Podcast, PodcastSummary};

use super::app::Input;
use super::audio::AudioOutput;
use super::persistence;

/// Cloneable route back into the dispatch loop.
#[derive(Clone)]
pub struct MsgSender {
    tx: mpsc::Sender<Input>,
}

impl MsgSender {
    pub fn new(tx: mpsc::Sender<Input>) -> Self {
        Self { tx }
    }

    pub fn send(&self, msg: Msg) {
        let _ = self.tx.send(Input::Msg(msg));
    }
}

/// Translates engine completions into core messages.
struct EngineBridge {
    msgs: MsgSender,
}

impl EventSink for EngineBridge {
    fn emit(&self, event: EngineEvent) {
        self.msgs.send(map_event(event));
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    audio: Box<dyn AudioOutput>,
    data_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        config: EngineConfig,
        msgs: MsgSender,
        audio: Box<dyn AudioOutput>,
        data_dir: PathBuf,
    ) -> Self {
        let engine = EngineHandle::new(config, Arc::new(EngineBridge { msgs }));
        Self {
            engine,
            audio,
            data_dir,
        }
    }

    /// Runs every effect and hands back the notices for the UI to show.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::Search { term } => {
                    engine_info!("Search term_len={} term={}", term.len(), term);
                    self.engine.search(term);
                }
                Effect::FetchPreview { key } => {
                    engine_info!("FetchPreview key={}", key);
                    self.engine.preview(key);
                }
                Effect::CancelPreview { key } => self.engine.cancel_preview(key),
                Effect::StartPlayback { key, media_url } => {
                    engine_info!("StartPlayback key={} media={}", key, media_url);
                    self.audio.load_and_play(&media_url);
                }
                Effect::PausePlayback => self.audio.pause(),
                Effect::ResumePlayback => self.audio.resume(),
                Effect::StopPlayback => self.audio.stop(),
                Effect::LoadDetails { key, image_url } => {
                    self.engine.load_details(key, image_url)
                }
                Effect::SaveSubscriptions(keys) => {
                    persistence::save_subscriptions(&self.data_dir, &keys);
                }
                Effect::Notify(notice) => {
                    engine_debug!("Notice {:?}", notice);
                    notices.push(notice);
                }
            }
        }
        notices
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { term, result } => match result {
            Ok(summaries) => Msg::SearchCompleted {
                term,
                rows: summaries.into_iter().map(map_summary).collect(),
            },
            Err(err) => {
                engine_warn!("Search for '{}' failed: {}", term, err);
                Msg::SearchFailed { term }
            }
        },
        EngineEvent::PreviewResolved { key, media_url } => Msg::PreviewResolved { key, media_url },
        EngineEvent::PreviewFailed { key } => Msg::PreviewFailed { key },
        EngineEvent::DetailsLoaded { key, podcast } => Msg::DetailsLoaded {
            key,
            details: podcast.map(map_podcast),
        },
    }
}

fn map_summary(summary: PodcastSummary) -> ResultRow {
    ResultRow {
        key: summary.feed_url,
        name: summary.name,
        author: summary.author,
        image_url: summary.image_url,
        open_url: summary.open_url,
        raw_release_date: summary.raw_release_date,
    }
}

fn map_podcast(podcast: Podcast) -> EpisodeListView {
    EpisodeListView {
        key: podcast.feed_url,
        title: podcast.title,
        description: podcast.description,
        image_url: podcast.image_url,
        episodes: podcast
            .episodes
            .into_iter()
            .map(|episode| EpisodeRowView {
                title: episode.title,
                released: episode.released,
                duration_text: episode.duration_text,
                media_url: episode.media_url,
            })
            .collect(),
    }
}
