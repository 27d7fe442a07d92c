//! Podplay core: pure preview coordinator, search results and view-model helpers.
mod coordinator;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use coordinator::{Playback, PreviewPolicy};
pub use effect::{Effect, Notice};
pub use msg::Msg;
pub use state::{AppState, FeedKey, ResultRow};
pub use update::update;
pub use view_model::{AppViewModel, EpisodeListView, EpisodeRowView, PreviewState, ResultRowView};
