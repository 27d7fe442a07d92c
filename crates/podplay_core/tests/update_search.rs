use chrono::{TimeZone, Utc};
use podplay_core::{
    update, AppState, Effect, EpisodeListView, EpisodeRowView, Msg, Notice, Playback,
    PreviewState, ResultRow,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn row(key: &str, name: &str) -> ResultRow {
    ResultRow {
        key: key.to_string(),
        name: name.to_string(),
        ..ResultRow::default()
    }
}

fn searched(term: &str, rows: Vec<ResultRow>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SearchSubmitted(term.to_string()));
    let (state, _) = update(
        state,
        Msg::SearchCompleted {
            term: term.trim().to_string(),
            rows,
        },
    );
    state
}

#[test]
fn search_submission_trims_and_emits_effect() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("  history  ".to_string()));

    assert_eq!(
        effects,
        vec![Effect::Search {
            term: "history".to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.query.as_deref(), Some("history"));
    assert!(view.searching);
}

#[test]
fn completed_search_populates_rows_in_order() {
    init_logging();
    let state = searched("history", vec![row("k1", "One Two Three"), row("k2", "Four Five Six")]);

    let view = state.view();
    assert!(!view.searching);
    let keys: Vec<&str> = view.rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["k1", "k2"]);
    assert_eq!(view.rows[1].index, 1);
    assert!(view.rows.iter().all(|row| row.preview == PreviewState::Idle));
}

#[test]
fn rows_reflect_the_single_active_preview() {
    init_logging();
    let state = searched("history", vec![row("k1", "a b c"), row("k2", "d e f")]);
    let (state, _) = update(state, Msg::PreviewSelected { key: "k2".to_string() });

    let previews: Vec<PreviewState> = state.view().rows.iter().map(|row| row.preview).collect();
    assert_eq!(previews, vec![PreviewState::Idle, PreviewState::Loading]);
}

#[test]
fn new_results_reset_an_active_preview() {
    init_logging();
    let state = searched("history", vec![row("k1", "a b c")]);
    let (state, _) = update(state, Msg::PreviewSelected { key: "k1".to_string() });
    let (state, _) = update(
        state,
        Msg::PreviewResolved {
            key: "k1".to_string(),
            media_url: "https://cdn/a.mp3".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SearchSubmitted("science".to_string()));
    assert_eq!(state.playback(), &Playback::Playing { key: "k1".to_string() });

    let (state, effects) = update(
        state,
        Msg::SearchCompleted {
            term: "science".to_string(),
            rows: vec![row("k9", "x y z")],
        },
    );

    assert_eq!(effects, vec![Effect::StopPlayback]);
    assert_eq!(state.playback(), &Playback::Idle);
    assert_eq!(state.rows().len(), 1);
}

#[test]
fn results_for_superseded_search_are_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchSubmitted("first".to_string()));
    let (state, _) = update(state, Msg::SearchSubmitted("second".to_string()));

    let (state, effects) = update(
        state,
        Msg::SearchCompleted {
            term: "first".to_string(),
            rows: vec![row("k1", "a b c")],
        },
    );

    assert!(effects.is_empty());
    assert!(state.rows().is_empty());
    assert!(state.view().searching);
}

#[test]
fn search_failure_notifies_and_keeps_rows() {
    init_logging();
    let state = searched("history", vec![row("k1", "a b c")]);
    let (state, _) = update(state, Msg::SearchSubmitted("broken".to_string()));

    let (state, effects) = update(
        state,
        Msg::SearchFailed {
            term: "broken".to_string(),
        },
    );

    assert_eq!(effects, vec![Effect::Notify(Notice::SearchFailed)]);
    assert_eq!(state.rows().len(), 1);
    assert!(!state.view().searching);
}

#[test]
fn blank_search_clears_results_and_cancels_loading() {
    init_logging();
    let state = searched("history", vec![row("k1", "a b c")]);
    let (state, _) = update(state, Msg::PreviewSelected { key: "k1".to_string() });

    let (state, effects) = update(state, Msg::SearchSubmitted("   ".to_string()));

    assert_eq!(effects, vec![Effect::CancelPreview { key: "k1".to_string() }]);
    assert!(state.rows().is_empty());
    assert_eq!(state.view().query, None);
    assert_eq!(state.playback(), &Playback::Idle);
}

#[test]
fn results_cleared_stops_playback() {
    init_logging();
    let state = searched("history", vec![row("k1", "a b c")]);
    let (state, _) = update(state, Msg::PreviewSelected { key: "k1".to_string() });
    let (state, _) = update(
        state,
        Msg::PreviewResolved {
            key: "k1".to_string(),
            media_url: "https://cdn/a.mp3".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::ResultsCleared);

    assert_eq!(effects, vec![Effect::StopPlayback]);
    assert!(state.rows().is_empty());
}

#[test]
fn details_are_loaded_for_latest_request_only() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::DetailsRequested {
            key: "k1".to_string(),
            image_url: "https://img/k1.jpg".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::LoadDetails {
            key: "k1".to_string(),
            image_url: "https://img/k1.jpg".to_string(),
        }]
    );
    let (state, _) = update(
        state,
        Msg::DetailsRequested {
            key: "k2".to_string(),
            image_url: "https://img/k2.jpg".to_string(),
        },
    );

    let details = |key: &str| EpisodeListView {
        key: key.to_string(),
        title: "Show".to_string(),
        description: String::new(),
        image_url: format!("https://img/{key}.jpg"),
        episodes: vec![EpisodeRowView {
            title: "Ep".to_string(),
            released: Utc.with_ymd_and_hms(2024, 10, 2, 10, 0, 0).unwrap(),
            duration_text: "10:00".to_string(),
            media_url: "https://cdn/ep.mp3".to_string(),
        }],
    };

    let (state, effects) = update(
        state,
        Msg::DetailsLoaded {
            key: "k1".to_string(),
            details: Some(details("k1")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().details, None);

    let (state, effects) = update(
        state,
        Msg::DetailsLoaded {
            key: "k2".to_string(),
            details: Some(details("k2")),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    let shown = view.details.expect("details");
    assert_eq!(shown.key, "k2");
    assert_eq!(shown.image_url, "https://img/k2.jpg");
    assert!(shown.episodes[0].is_playable());
    assert_eq!(state.playback(), &Playback::Idle);
}

#[test]
fn failed_details_notify_load_error() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::DetailsRequested {
            key: "k1".to_string(),
            image_url: String::new(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::DetailsLoaded {
            key: "k1".to_string(),
            details: None,
        },
    );

    assert_eq!(effects, vec![Effect::Notify(Notice::LoadError)]);
    assert_eq!(state.view().details, None);
}

#[test]
fn blank_details_key_is_rejected() {
    init_logging();
    let (_, effects) = update(
        AppState::new(),
        Msg::DetailsRequested {
            key: " ".to_string(),
            image_url: String::new(),
        },
    );
    assert_eq!(effects, vec![Effect::Notify(Notice::MissingFeedUrl)]);
}
