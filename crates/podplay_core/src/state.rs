use std::collections::BTreeSet;

use crate::view_model::{AppViewModel, EpisodeListView, ResultRowView};
use crate::{Effect, Playback, PreviewPolicy};

/// Feed URL identifying one selectable result row.
pub type FeedKey = String;

/// One search result as the core needs it. `key` is the feed URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRow {
    pub key: FeedKey,
    pub name: String,
    pub author: String,
    pub image_url: String,
    pub open_url: String,
    pub raw_release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    query: Option<String>,
    searching: bool,
    rows: Vec<ResultRow>,
    playback: Playback,
    policy: PreviewPolicy,
    subscriptions: BTreeSet<FeedKey>,
    pending_details: Option<FeedKey>,
    details: Option<EpisodeListView>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PreviewPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| ResultRowView {
                index,
                key: row.key.clone(),
                name: row.name.clone(),
                author: row.author.clone(),
                image_url: row.image_url.clone(),
                open_url: row.open_url.clone(),
                raw_release_date: row.raw_release_date.clone(),
                preview: self.playback.state_of(&row.key),
                subscribed: self.subscriptions.contains(&row.key),
            })
            .collect();

        AppViewModel {
            query: self.query.clone(),
            searching: self.searching,
            rows,
            playback: self.playback.clone(),
            subscriptions: self.subscriptions.iter().cloned().collect(),
            details: self.details.clone(),
            dirty: self.dirty,
        }
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn is_subscribed(&self, key: &str) -> bool {
        self.subscriptions.contains(key)
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn select_preview(&mut self, key: &str) -> Vec<Effect> {
        let before = self.playback.clone();
        let effects = self.playback.select(key);
        if self.playback != before {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn resolve_preview(&mut self, key: &str, media_url: &str) -> Vec<Effect> {
        let policy = self.policy;
        let effects = self.playback.resolved(key, media_url, &policy);
        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn fail_preview(&mut self, key: &str) -> Vec<Effect> {
        let effects = self.playback.resolution_failed(key);
        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn apply_physical_state(&mut self, is_playing: bool) {
        let before = self.playback.clone();
        self.playback.physical_state_changed(is_playing);
        if self.playback != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_physical_error(&mut self, code: &str) -> Vec<Effect> {
        let effects = self.playback.physical_error(code);
        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn reset_playback(&mut self) -> Vec<Effect> {
        if !self.playback.is_idle() {
            self.mark_dirty();
        }
        self.playback.reset()
    }

    pub(crate) fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub(crate) fn begin_search(&mut self, term: String) {
        self.query = Some(term);
        self.searching = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_search(&mut self, rows: Vec<ResultRow>) {
        self.searching = false;
        self.rows = rows;
        self.mark_dirty();
    }

    pub(crate) fn abort_search(&mut self) {
        self.searching = false;
        self.mark_dirty();
    }

    pub(crate) fn clear_results(&mut self) {
        self.query = None;
        self.searching = false;
        self.rows.clear();
        self.mark_dirty();
    }

    pub(crate) fn request_details(&mut self, key: FeedKey) {
        self.pending_details = Some(key);
        self.details = None;
        self.mark_dirty();
    }

    /// Accepts details only for the most recent request.
    pub(crate) fn take_pending_details(&mut self, key: &str) -> bool {
        if self.pending_details.as_deref() == Some(key) {
            self.pending_details = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_details(&mut self, details: Option<EpisodeListView>) {
        self.details = details;
        self.mark_dirty();
    }

    /// Flip subscription for `key`; returns the new membership.
    pub(crate) fn toggle_subscription(&mut self, key: &str) -> bool {
        let subscribed = if self.subscriptions.remove(key) {
            false
        } else {
            self.subscriptions.insert(key.to_string());
            true
        };
        self.mark_dirty();
        subscribed
    }

    pub(crate) fn subscription_list(&self) -> Vec<FeedKey> {
        self.subscriptions.iter().cloned().collect()
    }

    pub(crate) fn restore_subscriptions(&mut self, keys: Vec<FeedKey>) {
        self.subscriptions = keys
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        self.mark_dirty();
    }
}
