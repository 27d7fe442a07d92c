use engine_logging::engine_debug;

use crate::{AppState, Effect, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted(raw) => {
            let term = raw.trim();
            if term.is_empty() {
                state.clear_results();
                state.reset_playback()
            } else {
                state.begin_search(term.to_string());
                vec![Effect::Search {
                    term: term.to_string(),
                }]
            }
        }
        Msg::SearchCompleted { term, rows } => {
            if state.query() != Some(term.as_str()) {
                engine_debug!("Ignoring results for superseded search '{}'", term);
                return (state, Vec::new());
            }
            // New results supersede whatever row owned the audio session.
            let effects = state.reset_playback();
            state.finish_search(rows);
            effects
        }
        Msg::SearchFailed { term } => {
            if state.query() != Some(term.as_str()) {
                return (state, Vec::new());
            }
            state.abort_search();
            vec![Effect::Notify(Notice::SearchFailed)]
        }
        Msg::ResultsCleared => {
            state.clear_results();
            state.reset_playback()
        }
        Msg::PreviewSelected { key } => state.select_preview(&key),
        Msg::PreviewResolved { key, media_url } => state.resolve_preview(&key, &media_url),
        Msg::PreviewFailed { key } => state.fail_preview(&key),
        Msg::PlaybackStateChanged { is_playing } => {
            state.apply_physical_state(is_playing);
            Vec::new()
        }
        Msg::PlaybackError { code } => state.apply_physical_error(&code),
        Msg::StopClicked => state.reset_playback(),
        Msg::DetailsRequested { key, image_url } => {
            let key = key.trim();
            if key.is_empty() {
                vec![Effect::Notify(Notice::MissingFeedUrl)]
            } else {
                state.request_details(key.to_string());
                vec![Effect::LoadDetails {
                    key: key.to_string(),
                    image_url,
                }]
            }
        }
        Msg::DetailsLoaded { key, details } => {
            if !state.take_pending_details(&key) {
                return (state, Vec::new());
            }
            let failed = details.is_none();
            state.set_details(details);
            if failed {
                vec![Effect::Notify(Notice::LoadError)]
            } else {
                Vec::new()
            }
        }
        Msg::SubscriptionToggled { key } => {
            let key = key.trim();
            if key.is_empty() {
                vec![Effect::Notify(Notice::MissingFeedUrl)]
            } else {
                state.toggle_subscription(key);
                vec![Effect::SaveSubscriptions(state.subscription_list())]
            }
        }
        Msg::RestoreSubscriptions(keys) => {
            state.restore_subscriptions(keys);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
