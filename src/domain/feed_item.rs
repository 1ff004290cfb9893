use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute key holding the card color on detail pages
pub const COLOR_ATTRIBUTE: &str = "color";
/// Attribute key holding the card type line on detail pages
pub const TYPE_ATTRIBUTE: &str = "type";

/// A card scraped from the spoiler feed
///
/// Created from a listing page with name, detail link and image, then
/// enriched with the `key: value` rows of its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub name: String,
    #[serde(rename = "detailUrl")]
    pub detail_url: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl FeedItem {
    pub fn new(name: impl Into<String>, detail_url: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_url: detail_url.into(),
            image_url: image_url.into(),
            attributes: HashMap::new(),
        }
    }

    /// Merge detail attributes into the item; incoming values win.
    #[must_use]
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Builder helper used mostly by tests and fixtures
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.attribute(COLOR_ATTRIBUTE)
    }

    pub fn card_type(&self) -> Option<&str> {
        self.attribute(TYPE_ATTRIBUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_keeps_identity_and_overwrites_attributes() {
        let item = FeedItem::new("Thing in the Ice", "https://feed/thing", "https://feed/thing.jpg")
            .with_attribute("color", "Red");

        let mut details = HashMap::new();
        details.insert("color".to_string(), "Blue".to_string());
        details.insert("type".to_string(), "Creature".to_string());
        let enriched = item.with_attributes(details);

        assert_eq!(enriched.name, "Thing in the Ice");
        assert_eq!(enriched.detail_url, "https://feed/thing");
        assert_eq!(enriched.color(), Some("Blue"));
        assert_eq!(enriched.card_type(), Some("Creature"));
    }
}
