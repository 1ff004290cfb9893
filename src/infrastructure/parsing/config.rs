//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the spoiler listing, card detail and review
//! pages. Defaults match the markup of the feed and review sites.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub list: ListSelectors,
    pub detail: DetailSelectors,
    pub review: ReviewSelectors,
}

/// CSS selectors for spoiler listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSelectors {
    /// Link around each card; `title` is the name, `href` the detail page
    pub card_link: String,

    /// Image inside the card link
    pub card_image: String,

    /// Link to the next listing page
    pub next_page: String,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            card_link: ".spoiler-set-card > a".to_string(),
            card_image: "img".to_string(),
            next_page: ".nextpostslink".to_string(),
        }
    }
}

/// CSS selectors for card detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Rows holding one `key: value` pair each
    pub attribute_row: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            attribute_row: ".card-type".to_string(),
        }
    }
}

/// Selectors and markers for set review articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSelectors {
    /// Heading candidates for a rating line
    pub rating_heading: String,

    /// Text a rating heading must contain, also stripped as its prefix
    pub rating_marker: String,

    /// Paragraphs starting with this are flavor text, not review text
    pub flavor_marker: String,
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            rating_heading: "h3".to_string(),
            rating_marker: "Limited".to_string(),
            flavor_marker: "Flavor".to_string(),
        }
    }
}
