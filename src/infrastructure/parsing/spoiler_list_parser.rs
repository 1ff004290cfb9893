//! Spoiler listing page parser
//!
//! Extracts one [`FeedItem`] per card link on a listing page plus the link
//! to the next page, if any.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::ListSelectors;
use super::{PageParser, ParsingResult, compile_selector, resolve_url};
use crate::domain::FeedItem;

lazy_static! {
    /// `-216x302` thumbnail suffix right before a three character extension
    static ref THUMBNAIL_SUFFIX: Regex = Regex::new(r"-\d+x\d+(\..{3})$").unwrap();
}

/// Full size image URL for a thumbnail URL
pub fn full_size_image_url(src: &str) -> String {
    THUMBNAIL_SUFFIX.replace(src, "$1").into_owned()
}

/// Items of one listing page and the link to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoilerPage {
    pub items: Vec<FeedItem>,
    pub next_page_url: Option<String>,
}

/// Parser for spoiler listing pages
pub struct SpoilerListParser {
    card_link: Selector,
    card_image: Selector,
    next_page: Selector,
}

impl SpoilerListParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListSelectors::default())
    }

    pub fn with_config(selectors: &ListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            card_link: compile_selector(&selectors.card_link)?,
            card_image: compile_selector(&selectors.card_image)?,
            next_page: compile_selector(&selectors.next_page)?,
        })
    }

    fn extract_item(&self, link: &ElementRef, index: usize, page_url: &str) -> ParsingResult<Option<FeedItem>> {
        let name = link.value().attr("title").map(str::trim).unwrap_or_default();
        if name.is_empty() {
            warn!("Skipping card link {} on {}: no title", index, page_url);
            return Ok(None);
        }

        let Some(href) = link.value().attr("href") else {
            warn!("Skipping '{}' on {}: no detail link", name, page_url);
            return Ok(None);
        };
        let detail_url = resolve_url(href, page_url)?;

        let image_url = match link.select(&self.card_image).next().and_then(|img| img.value().attr("src")) {
            Some(src) => full_size_image_url(&resolve_url(src, page_url)?),
            None => {
                debug!("No image for '{}' on {}", name, page_url);
                String::new()
            }
        };

        Ok(Some(FeedItem::new(name, detail_url, image_url)))
    }
}

impl PageParser for SpoilerListParser {
    type Output = SpoilerPage;

    fn parse_page(&self, html: &Html, page_url: &str) -> ParsingResult<SpoilerPage> {
        let mut items = Vec::new();
        for (index, link) in html.select(&self.card_link).enumerate() {
            if let Some(item) = self.extract_item(&link, index, page_url)? {
                items.push(item);
            }
        }

        let next_page_url = html
            .select(&self.next_page)
            .next()
            .and_then(|link| link.value().attr("href"))
            .filter(|href| !href.trim().is_empty())
            .map(|href| resolve_url(href, page_url))
            .transpose()?;

        debug!("Parsed {} cards from {} (next: {:?})", items.len(), page_url, next_page_url);
        Ok(SpoilerPage { items, next_page_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "http://www.magicspoiler.com/shadows-over-innistrad/";

    const LISTING: &str = r#"
        <html><body>
          <div class="spoiler-set-card">
            <a href="http://www.magicspoiler.com/mtg-spoiler/archangel-avacyn/" title="Archangel Avacyn">
              <img src="http://www.magicspoiler.com/wp-content/uploads/2016/03/Archangel-Avacyn-216x302.jpg">
            </a>
          </div>
          <div class="spoiler-set-card">
            <a href="/mtg-spoiler/kindly-stranger/" title="Kindly  Stranger">
              <img src="/wp-content/uploads/2016/03/Kindly-Stranger.png">
            </a>
          </div>
          <div class="spoiler-set-card"><a href="/mtg-spoiler/untitled/"><img src="x.jpg"></a></div>
          <div class="nav"><a class="nextpostslink" href="page/2/">»</a></div>
        </body></html>
    "#;

    #[test]
    fn test_parser_creation() {
        assert!(SpoilerListParser::new().is_ok());
    }

    #[test]
    fn parses_cards_in_page_order() {
        let page = SpoilerListParser::new().unwrap().parse_str(LISTING, PAGE_URL).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Archangel Avacyn");
        assert_eq!(page.items[0].detail_url, "http://www.magicspoiler.com/mtg-spoiler/archangel-avacyn/");
        assert_eq!(
            page.items[0].image_url,
            "http://www.magicspoiler.com/wp-content/uploads/2016/03/Archangel-Avacyn.jpg"
        );
        assert_eq!(page.items[1].name, "Kindly  Stranger");
        assert_eq!(page.items[1].detail_url, "http://www.magicspoiler.com/mtg-spoiler/kindly-stranger/");
        assert_eq!(
            page.items[1].image_url,
            "http://www.magicspoiler.com/wp-content/uploads/2016/03/Kindly-Stranger.png"
        );
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("http://www.magicspoiler.com/shadows-over-innistrad/page/2/")
        );
    }

    #[test]
    fn last_page_has_no_next_link() {
        let markup = r#"<div class="spoiler-set-card"><a href="/a/" title="A"><img src="/a.jpg"></a></div>"#;
        let page = SpoilerListParser::new().unwrap().parse_str(markup, PAGE_URL).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn thumbnail_suffix_is_stripped_only_before_extension() {
        assert_eq!(full_size_image_url("https://x/Card-216x302.jpg"), "https://x/Card.jpg");
        assert_eq!(full_size_image_url("https://x/Card-216x302-b.jpg"), "https://x/Card-216x302-b.jpg");
        assert_eq!(full_size_image_url("https://x/Card-1x1.jpeg"), "https://x/Card-1x1.jpeg");
    }
}
