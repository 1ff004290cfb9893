//! Set review article parser
//!
//! Review articles are flat sequences of siblings:
//!
//! ```text
//! <h1>Card Name</h1>
//! <img ...>
//! <h3>Limited: 3.5</h3>
//! <p>Flavor: ...</p>        (optional)
//! <p>review</p><p>more review</p>
//! ```

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::ReviewSelectors;
use super::{PageParser, ParsingResult, compile_selector};
use crate::domain::Review;

/// Parser for set review articles
pub struct ReviewParser {
    rating_heading: Selector,
    rating_marker: String,
    flavor_marker: String,
}

impl ReviewParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ReviewSelectors::default())
    }

    pub fn with_config(selectors: &ReviewSelectors) -> ParsingResult<Self> {
        Ok(Self {
            rating_heading: compile_selector(&selectors.rating_heading)?,
            rating_marker: selectors.rating_marker.clone(),
            flavor_marker: selectors.flavor_marker.clone(),
        })
    }

    /// Rating value of a heading like "Limited: 3.0 // 2.5"
    fn rating_of(&self, heading_text: &str) -> String {
        let text = heading_text.trim();
        let after_marker = text
            .find(&self.rating_marker)
            .map_or(text, |idx| &text[idx + self.rating_marker.len()..]);
        after_marker.trim_start_matches(':').trim().to_string()
    }

    fn review_text(&self, heading: &ElementRef) -> String {
        let mut next = next_element(heading);
        if next.is_some_and(|el| text_of(&el).starts_with(&self.flavor_marker)) {
            next = next.and_then(|el| next_element(&el));
        }

        let Some(first) = next else {
            return String::new();
        };

        let tag = first.value().name();
        std::iter::once(first)
            .chain(
                first
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .take_while(|el| el.value().name() == tag),
            )
            .map(|el| text_of(&el))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn next_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

impl PageParser for ReviewParser {
    type Output = Vec<Review>;

    fn parse_page(&self, html: &Html, page_url: &str) -> ParsingResult<Vec<Review>> {
        let mut reviews = Vec::new();

        for heading in html.select(&self.rating_heading) {
            let heading_text = text_of(&heading);
            if !heading_text.contains(&self.rating_marker) {
                continue;
            }

            // The card name sits two elements above its rating heading
            let name = heading
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .nth(1)
                .map(|el| text_of(&el))
                .unwrap_or_default();
            // Kept with an empty name so the run fails matching it
            if name.is_empty() {
                warn!("Rating '{}' on {} has no card name", heading_text, page_url);
            }

            reviews.push(Review {
                name,
                rating: self.rating_of(&heading_text),
                text: self.review_text(&heading),
            });
        }

        debug!("Parsed {} reviews from {}", reviews.len(), page_url);
        Ok(reviews)
    }
}
