use std::path::{Path, PathBuf};

use engine_logging::{engine_error, engine_info, engine_warn};
use podplay_core::FeedKey;
use podplay_engine::{read_optional, AtomicFileWriter};
use serde::{Deserialize, Serialize};

pub(crate) const SUBSCRIPTIONS_FILENAME: &str = ".podplay_subscriptions.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSubscriptions {
    feeds: Vec<FeedKey>,
}

/// Subscribed feed keys from disk. Missing or unreadable files yield an empty set.
pub(crate) fn load_subscriptions(data_dir: &Path) -> Vec<FeedKey> {
    let content = match read_optional(data_dir, SUBSCRIPTIONS_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(err) => {
            engine_warn!(
                "Failed to read subscriptions from {:?}: {}",
                data_dir.join(SUBSCRIPTIONS_FILENAME),
                err
            );
            return Vec::new();
        }
    };

    let persisted: PersistedSubscriptions = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            engine_warn!("Failed to parse subscriptions in {:?}: {}", data_dir, err);
            return Vec::new();
        }
    };

    let feeds: Vec<FeedKey> = persisted
        .feeds
        .into_iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect();
    engine_info!("Loaded {} subscriptions from {:?}", feeds.len(), data_dir);
    feeds
}

pub(crate) fn save_subscriptions(data_dir: &Path, feeds: &[FeedKey]) {
    let persisted = PersistedSubscriptions {
        feeds: feeds.to_vec(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize subscriptions: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(data_dir));
    if let Err(err) = writer.write(SUBSCRIPTIONS_FILENAME, &content) {
        engine_error!("Failed to write subscriptions to {:?}: {}", writer.dir(), err);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_subscriptions, save_subscriptions, SUBSCRIPTIONS_FILENAME};

    #[test]
    fn saved_subscriptions_load_back_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let feeds = vec![
            "https://feeds.example.com/a.xml".to_string(),
            "https://feeds.example.com/b.xml".to_string(),
        ];

        save_subscriptions(dir.path(), &feeds);

        assert!(dir.path().join(SUBSCRIPTIONS_FILENAME).exists());
        assert_eq!(load_subscriptions(dir.path()), feeds);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_subscriptions(dir.path()).is_empty());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(SUBSCRIPTIONS_FILENAME), "feeds: [oops").expect("write");
        assert!(load_subscriptions(dir.path()).is_empty());
    }

    #[test]
    fn save_creates_missing_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("nested");

        save_subscriptions(&nested, &["https://feeds.example.com/a.xml".to_string()]);

        assert_eq!(load_subscriptions(&nested).len(), 1);
    }

    #[test]
    fn blank_entries_are_dropped_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(SUBSCRIPTIONS_FILENAME),
            r#"(feeds: ["  ", "https://feeds.example.com/a.xml"])"#,
        )
        .expect("write");
        assert_eq!(
            load_subscriptions(dir.path()),
            vec!["https://feeds.example.com/a.xml".to_string()]
        );
    }
}
