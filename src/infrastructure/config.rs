//! Configuration infrastructure
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`spoiler-sync.toml` or an explicit path)
//! 3. `SPOILER_SYNC_*` environment variables (`__` separates sections)
//! 4. Legacy `TRELLO_API_KEY` / `TRELLO_USER_TOKEN` / `BOARD_ID` variables
//! 5. Command line flags, applied by the binary

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use url::Url;

use super::http_client::HttpClientConfig;
use super::parsing::ParsingConfig;
use super::trello_client::TrelloConfig;
use crate::domain::CardPosition;

/// Configuration file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "spoiler-sync";
pub const ENV_PREFIX: &str = "SPOILER_SYNC";

pub const LEGACY_API_KEY_VAR: &str = "TRELLO_API_KEY";
pub const LEGACY_USER_TOKEN_VAR: &str = "TRELLO_USER_TOKEN";
pub const LEGACY_BOARD_ID_VAR: &str = "BOARD_ID";

/// Default values
pub mod defaults {
    pub const SPOILER_URL: &str = "http://www.magicspoiler.com/shadows-over-innistrad/";
    pub const REVIEW_URLS: [&str; 2] = [
        "http://www.channelfireball.com/articles/shadows-over-innistrad-limited-set-review-white/",
        "http://www.channelfireball.com/articles/shadows-over-innistrad-limited-set-review-blue-cards/",
    ];
    pub const REVIEWER_LABEL: &str = "LSV";
    pub const DETAIL_CONCURRENCY: usize = 50;
    pub const APPLY_CONCURRENCY: usize = 1;
    pub const DRY_RUN: bool = true;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIRECTORY: &str = "logs";
    pub const LOG_FILE_NAME: &str = "spoiler-sync.log";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error("Missing setting: {message}")]
    Missing { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub reviews: ReviewConfig,
    pub pipeline: PipelineConfig,
    pub trello: TrelloConfig,
    pub http: HttpClientConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// Spoiler feed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// First listing page; later pages are discovered through next links
    pub start_url: String,

    /// Maximum number of new cards handled per run, unlimited when unset
    pub max_new_cards: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            start_url: defaults::SPOILER_URL.to_string(),
            max_new_cards: None,
        }
    }
}

/// Set review settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Review articles, scraped in order
    pub urls: Vec<String>,

    /// Maximum number of reviews handled per run, unlimited when unset
    pub limit: Option<usize>,

    /// Prefix of the posted comment
    pub reviewer_label: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            urls: defaults::REVIEW_URLS.iter().map(ToString::to_string).collect(),
            limit: None,
            reviewer_label: defaults::REVIEWER_LABEL.to_string(),
        }
    }
}

/// Concurrency and write behavior shared by both pipelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detail pages fetched at once
    pub detail_concurrency: usize,

    /// Board writes in flight at once
    pub apply_concurrency: usize,

    /// Log intended writes instead of performing them
    pub dry_run: bool,

    /// Where new cards go in their list
    pub card_position: CardPosition,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: defaults::DETAIL_CONCURRENCY,
            apply_concurrency: defaults::APPLY_CONCURRENCY,
            dry_run: defaults::DRY_RUN,
            card_position: CardPosition::Top,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file, relative to the working directory
    pub directory: String,

    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            directory: defaults::LOG_DIRECTORY.to_string(),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("h2".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Load defaults, the config file and `SPOILER_SYNC_*` variables, then
    /// the legacy Trello variables from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, std::env::vars().collect())
    }

    /// Same as [`AppConfig::load`] over an explicit set of environment
    /// variables.
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("reviews.urls")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply_legacy_env(|key| env.get(key).cloned());
        Ok(config)
    }

    /// Fill Trello settings still unset from the legacy variables
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let trello = &mut self.trello;
        if trello.api_key.is_none() {
            trello.api_key = lookup(LEGACY_API_KEY_VAR);
        }
        if trello.user_token.is_none() {
            trello.user_token = lookup(LEGACY_USER_TOKEN_VAR);
        }
        if trello.board_id.is_none() {
            trello.board_id = lookup(LEGACY_BOARD_ID_VAR);
        }
    }

    /// Reject settings no run can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.detail_concurrency == 0 {
            return Err(ConfigError::validation("pipeline.detail_concurrency must be greater than 0"));
        }
        if self.pipeline.apply_concurrency == 0 {
            return Err(ConfigError::validation("pipeline.apply_concurrency must be greater than 0"));
        }
        Url::parse(&self.feed.start_url)
            .map_err(|e| ConfigError::validation(format!("feed.start_url '{}' is not a URL: {e}", self.feed.start_url)))?;
        for url in &self.reviews.urls {
            Url::parse(url).map_err(|e| ConfigError::validation(format!("review URL '{url}' is not a URL: {e}")))?;
        }
        Ok(())
    }

    /// Board every run reads from (and writes to outside dry runs)
    pub fn board_id(&self) -> Result<&str, ConfigError> {
        self.trello
            .board_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                message: format!("board id (set trello.board_id or {LEGACY_BOARD_ID_VAR})"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn defaults_are_dry_run_with_serial_writes() {
        let config = AppConfig::default();
        assert!(config.pipeline.dry_run);
        assert_eq!(config.pipeline.apply_concurrency, 1);
        assert_eq!(config.pipeline.detail_concurrency, 50);
        assert_eq!(config.reviews.urls.len(), 2);
        assert!(config.feed.max_new_cards.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[feed]
start_url = "https://spoilers.example/set/"
max_new_cards = 5

[pipeline]
detail_concurrency = 4
dry_run = false

[trello]
board_id = "board-from-file"
"#
        )
        .unwrap();

        let config = AppConfig::load_with_env(Some(file.path()), HashMap::new()).unwrap();
        assert_eq!(config.feed.start_url, "https://spoilers.example/set/");
        assert_eq!(config.feed.max_new_cards, Some(5));
        assert_eq!(config.pipeline.detail_concurrency, 4);
        assert_eq!(config.pipeline.apply_concurrency, 1);
        assert!(!config.pipeline.dry_run);
        assert_eq!(config.board_id().unwrap(), "board-from-file");
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let vars = env(&[
            ("SPOILER_SYNC_PIPELINE__APPLY_CONCURRENCY", "7"),
            ("SPOILER_SYNC_PIPELINE__DRY_RUN", "false"),
            ("SPOILER_SYNC_FEED__START_URL", "https://spoilers.example/env/"),
            ("SPOILER_SYNC_REVIEWS__URLS", "https://reviews.example/a/,https://reviews.example/b/"),
            ("BOARD_ID", "legacy-board"),
        ]);

        let config = AppConfig::load_with_env(None, vars).unwrap();
        assert_eq!(config.pipeline.apply_concurrency, 7);
        assert!(!config.pipeline.dry_run);
        assert_eq!(config.pipeline.detail_concurrency, 50);
        assert_eq!(config.feed.start_url, "https://spoilers.example/env/");
        assert_eq!(
            config.reviews.urls,
            vec!["https://reviews.example/a/".to_string(), "https://reviews.example/b/".to_string()]
        );
        assert_eq!(config.board_id().unwrap(), "legacy-board");
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let vars = env(&[("PIPELINE__APPLY_CONCURRENCY", "9"), ("SPOILERSYNC_PIPELINE__DRY_RUN", "false")]);
        let config = AppConfig::load_with_env(None, vars).unwrap();
        assert_eq!(config.pipeline.apply_concurrency, 1);
        assert!(config.pipeline.dry_run);
    }

    #[test]
    fn legacy_variables_fill_missing_trello_settings() {
        let mut config = AppConfig::default();
        config.trello.board_id = Some("explicit".to_string());
        config.apply_legacy_env(|key| match key {
            LEGACY_API_KEY_VAR => Some("key".to_string()),
            LEGACY_USER_TOKEN_VAR => Some("token".to_string()),
            LEGACY_BOARD_ID_VAR => Some("legacy".to_string()),
            _ => None,
        });
        assert_eq!(config.trello.api_key.as_deref(), Some("key"));
        assert_eq!(config.trello.user_token.as_deref(), Some("token"));
        assert_eq!(config.trello.board_id.as_deref(), Some("explicit"));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.apply_concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn missing_board_id_is_reported() {
        let config = AppConfig::default();
        assert!(matches!(config.board_id(), Err(ConfigError::Missing { .. })));
    }
}
