//! HTML parsing for the spoiler feed and review articles
//!
//! Parsers are built once from [`ParsingConfig`] selectors and then applied
//! to already-fetched markup. They never perform I/O.

pub mod card_detail_parser;
pub mod config;
pub mod review_parser;
pub mod spoiler_list_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use card_detail_parser::CardDetailParser;
pub use self::config::{DetailSelectors, ListSelectors, ParsingConfig, ReviewSelectors};
pub use review_parser::ReviewParser;
pub use spoiler_list_parser::{SpoilerListParser, SpoilerPage};

use scraper::{Html, Selector};
use url::Url;

/// Parser for one kind of page, resolving links against the page URL
pub trait PageParser {
    type Output;

    fn parse_page(&self, html: &Html, page_url: &str) -> ParsingResult<Self::Output>;

    /// Parse raw markup
    fn parse_str(&self, markup: &str, page_url: &str) -> ParsingResult<Self::Output> {
        let html = Html::parse_document(markup);
        self.parse_page(&html, page_url)
    }
}

/// Compile a configured selector string
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Resolve `href` against the URL of the page it was found on
pub(crate) fn resolve_url(href: &str, page_url: &str) -> ParsingResult<String> {
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.to_string());
    }

    let base = Url::parse(page_url).map_err(|e| ParsingError::UrlResolutionFailed {
        url: page_url.to_string(),
        reason: format!("Invalid base URL: {e}"),
        base_url: None,
    })?;

    base.join(href)
        .map(|url| url.to_string())
        .map_err(|e| ParsingError::UrlResolutionFailed {
            url: href.to_string(),
            reason: format!("Failed to join URL: {e}"),
            base_url: Some(page_url.to_string()),
        })
}
