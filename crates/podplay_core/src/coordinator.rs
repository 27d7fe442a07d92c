//! Single-flight preview coordinator.
//!
//! Many result rows share one audio session. [`Playback`] records which row
//! (if any) owns it, so at most one key is loading or playing at a time and
//! every other row reads as idle.

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{Effect, FeedKey, Notice, PreviewState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Idle,
    Loading { key: FeedKey },
    Playing { key: FeedKey },
    Paused { key: FeedKey },
}

/// How a resolved media URL is prepared before playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPolicy {
    /// Rewrite a leading `http://` to `https://`.
    pub upgrade_insecure_media: bool,
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        Self {
            upgrade_insecure_media: true,
        }
    }
}

impl PreviewPolicy {
    pub fn prepare_media_url(&self, media_url: &str) -> String {
        let media_url = media_url.trim();
        match media_url.strip_prefix("http://") {
            Some(rest) if self.upgrade_insecure_media => format!("https://{rest}"),
            _ => media_url.to_string(),
        }
    }
}

impl Playback {
    /// Key bound to the audio session; `None` exactly when idle.
    pub fn active_key(&self) -> Option<&str> {
        match self {
            Playback::Idle => None,
            Playback::Loading { key } | Playback::Playing { key } | Playback::Paused { key } => {
                Some(key)
            }
        }
    }

    pub fn state_of(&self, key: &str) -> PreviewState {
        match self {
            Playback::Loading { key: active } if active == key => PreviewState::Loading,
            Playback::Playing { key: active } if active == key => PreviewState::Playing,
            Playback::Paused { key: active } if active == key => PreviewState::Paused,
            _ => PreviewState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Playback::Idle)
    }

    pub(crate) fn select(&mut self, key: &str) -> Vec<Effect> {
        let key = key.trim();
        if key.is_empty() {
            return vec![Effect::Notify(Notice::MissingFeedUrl)];
        }

        let (next, effects) = match std::mem::take(self) {
            Playback::Playing { key: active } if active == key => {
                (Playback::Paused { key: active }, vec![Effect::PausePlayback])
            }
            Playback::Paused { key: active } if active == key => {
                (Playback::Playing { key: active }, vec![Effect::ResumePlayback])
            }
            Playback::Loading { key: active } => {
                engine_debug!("Preview for {} rejected; {} still loading", key, active);
                (
                    Playback::Loading { key: active },
                    vec![Effect::Notify(Notice::Busy)],
                )
            }
            Playback::Playing { .. } | Playback::Paused { .. } => (
                Playback::Loading {
                    key: key.to_string(),
                },
                vec![
                    Effect::StopPlayback,
                    Effect::FetchPreview {
                        key: key.to_string(),
                    },
                ],
            ),
            Playback::Idle => (
                Playback::Loading {
                    key: key.to_string(),
                },
                vec![Effect::FetchPreview {
                    key: key.to_string(),
                }],
            ),
        };
        *self = next;
        effects
    }

    pub(crate) fn resolved(
        &mut self,
        key: &str,
        media_url: &str,
        policy: &PreviewPolicy,
    ) -> Vec<Effect> {
        match std::mem::take(self) {
            Playback::Loading { key: active } if active == key => {
                if media_url.trim().is_empty() {
                    engine_info!("No playable episode for {}", key);
                    return vec![Effect::Notify(Notice::NoPlayableEpisode)];
                }
                let media_url = policy.prepare_media_url(media_url);
                *self = Playback::Playing {
                    key: active.clone(),
                };
                vec![Effect::StartPlayback {
                    key: active,
                    media_url,
                }]
            }
            other => {
                engine_debug!("Ignoring stale preview result for {}", key);
                *self = other;
                Vec::new()
            }
        }
    }

    pub(crate) fn resolution_failed(&mut self, key: &str) -> Vec<Effect> {
        match std::mem::take(self) {
            Playback::Loading { key: active } if active == key => {
                engine_warn!("Preview feed for {} could not be loaded", key);
                vec![Effect::Notify(Notice::LoadError)]
            }
            other => {
                engine_debug!("Ignoring stale preview failure for {}", key);
                *self = other;
                Vec::new()
            }
        }
    }

    /// Mirror the audio engine's playing flag; only meaningful once playback started.
    pub(crate) fn physical_state_changed(&mut self, is_playing: bool) {
        *self = match std::mem::take(self) {
            Playback::Playing { key } | Playback::Paused { key } => {
                if is_playing {
                    Playback::Playing { key }
                } else {
                    Playback::Paused { key }
                }
            }
            other => other,
        };
    }

    pub(crate) fn physical_error(&mut self, code: &str) -> Vec<Effect> {
        match std::mem::take(self) {
            Playback::Playing { key } | Playback::Paused { key } => {
                engine_warn!("Audio error {} while previewing {}", code, key);
                vec![Effect::Notify(Notice::PlaybackError {
                    code: code.to_string(),
                })]
            }
            other => {
                *self = other;
                Vec::new()
            }
        }
    }

    pub(crate) fn reset(&mut self) -> Vec<Effect> {
        match std::mem::take(self) {
            Playback::Idle => Vec::new(),
            Playback::Loading { key } => vec![Effect::CancelPreview { key }],
            Playback::Playing { .. } | Playback::Paused { .. } => vec![Effect::StopPlayback],
        }
    }
}
