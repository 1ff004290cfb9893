//! Infrastructure layer: HTTP fetching, HTML parsing, the Trello client,
//! configuration and logging.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod trello_client;

// Re-export commonly used items
pub use self::config::{AppConfig, ConfigError, FeedConfig, LoggingConfig, PipelineConfig, ReviewConfig};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging_with_config, log_system_info};
pub use parsing::{
    CardDetailParser, PageParser, ParsingConfig, ParsingError, ParsingResult, ReviewParser, SpoilerListParser,
    SpoilerPage,
};
pub use trello_client::{TrelloClient, TrelloConfig};
