use std::path::PathBuf;

use log::LevelFilter;

use super::logging::LogDestination;

pub const DATA_DIR_ENV: &str = "PODPLAY_DATA_DIR";
pub const LOG_ENV: &str = "PODPLAY_LOG";
pub const LOG_LEVEL_ENV: &str = "PODPLAY_LOG_LEVEL";
pub const SEARCH_URL_ENV: &str = "PODPLAY_SEARCH_URL";

const DEFAULT_DATA_DIR: &str = "./data";
const LOG_FILENAME: &str = "podplay.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub search_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_dir: non_blank(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_destination: non_blank(LOG_ENV)
                .and_then(|raw| LogDestination::parse(&raw))
                .unwrap_or(LogDestination::File),
            log_level: non_blank(LOG_LEVEL_ENV)
                .and_then(|raw| engine_logging::parse_level(&raw))
                .unwrap_or(LevelFilter::Info),
            search_url: non_blank(SEARCH_URL_ENV).map(|raw| raw.trim().to_string()),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use log::LevelFilter;

    use super::{AppConfig, DATA_DIR_ENV, LOG_ENV, LOG_LEVEL_ENV, SEARCH_URL_ENV};
    use crate::platform::logging::LogDestination;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_destination, LogDestination::File);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.search_url, None);
        assert_eq!(config.log_path(), PathBuf::from("./data/podplay.log"));
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = config_from(&[
            (DATA_DIR_ENV, "/tmp/podplay"),
            (LOG_ENV, "both"),
            (LOG_LEVEL_ENV, "debug"),
            (SEARCH_URL_ENV, " http://localhost:9000/search "),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/podplay"));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(
            config.search_url.as_deref(),
            Some("http://localhost:9000/search")
        );
    }

    #[test]
    fn blank_or_unknown_values_fall_back() {
        let config = config_from(&[(DATA_DIR_ENV, "  "), (LOG_ENV, "syslog"), (LOG_LEVEL_ENV, "loud")]);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_destination, LogDestination::File);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
