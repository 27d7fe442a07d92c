//! Pre-order walk over a parsed feed document.
//!
//! Episode fields are only picked up from nodes whose parent is `item` and
//! whose grandparent is `channel`. Anything nested deeper inside an item is
//! ignored even when it shares a field name.

use chrono::{DateTime, Utc};

use crate::date::normalize_date_with;
use crate::markup::Node;

pub const CHANNEL: &str = "channel";
pub const ITEM: &str = "item";

/// Raw per-item fields as they appeared in the document. `None` means the
/// field was never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub guid: Option<String>,
    pub pub_date: Option<String>,
    pub link: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub episodes: Vec<EpisodeDraft>,
}

/// Walk `root` and everything below it.
pub fn walk_feed(root: &Node, now: &dyn Fn() -> DateTime<Utc>) -> FeedDraft {
    let mut draft = FeedDraft::default();
    visit(root, None, None, &mut draft, now);
    draft
}

fn visit(
    node: &Node,
    parent: Option<&str>,
    grandparent: Option<&str>,
    draft: &mut FeedDraft,
    now: &dyn Fn() -> DateTime<Utc>,
) {
    let name = node.name.as_str();

    if parent == Some(ITEM) && grandparent == Some(CHANNEL) {
        if let Some(episode) = draft.episodes.last_mut() {
            apply_episode_field(episode, name, node);
        }
    }

    if parent == Some(CHANNEL) {
        match name {
            "title" => draft.title = Some(node.text_content()),
            "description" => draft.description = Some(node.text_content()),
            "itunes:summary" => draft.summary = Some(node.text_content()),
            ITEM => draft.episodes.push(EpisodeDraft::default()),
            "pubDate" => {
                let raw = node.text_content();
                draft.last_updated = Some(normalize_date_with(Some(raw.as_str()), now));
            }
            _ => {}
        }
    }

    for child in node.elements() {
        visit(child, Some(name), parent, draft, now);
    }
}

fn apply_episode_field(episode: &mut EpisodeDraft, name: &str, node: &Node) {
    match name {
        "title" => episode.title = Some(node.text_content()),
        "description" => episode.description = Some(node.text_content()),
        "itunes:duration" => episode.duration = Some(node.text_content()),
        "guid" => episode.guid = Some(node.text_content()),
        "pubDate" => episode.pub_date = Some(node.text_content()),
        "link" => episode.link = Some(node.text_content()),
        "enclosure" => {
            episode.url = node.attribute("url").map(str::to_string);
            episode.mime_type = node.attribute("type").map(str::to_string);
        }
        _ => {}
    }
}
