//! Card detail page parser
//!
//! Detail pages list card attributes as rows of `Key: Value` text. The
//! parser folds them into a lowercase-keyed map.

use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use super::config::DetailSelectors;
use super::{PageParser, ParsingResult, compile_selector};

/// Parser for card detail pages
pub struct CardDetailParser {
    attribute_row: Selector,
}

impl CardDetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            attribute_row: compile_selector(&selectors.attribute_row)?,
        })
    }
}

/// Split a row at its first colon into a trimmed, lowercase key and a
/// trimmed value.
pub fn parse_pair(row: &str) -> Option<(String, String)> {
    let (key, value) = row.split_once(':')?;
    Some((key.trim().to_lowercase(), value.trim().to_string()))
}

impl PageParser for CardDetailParser {
    type Output = HashMap<String, String>;

    fn parse_page(&self, html: &Html, page_url: &str) -> ParsingResult<HashMap<String, String>> {
        let mut attributes = HashMap::new();
        for row in html.select(&self.attribute_row) {
            let text = row.text().collect::<String>();
            match parse_pair(&text) {
                // Later rows overwrite earlier ones
                Some((key, value)) => {
                    attributes.insert(key, value);
                }
                None => debug!("Skipping detail row without a key on {}: {:?}", page_url, text.trim()),
            }
        }
        debug!("Extracted {} attributes from {}", attributes.len(), page_url);
        Ok(attributes)
    }
}
