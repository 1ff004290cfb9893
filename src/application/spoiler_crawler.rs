//! Walks the spoiler feed page by page
//!
//! The link to the next page is only known once the current page has been
//! parsed, so pages are fetched strictly one after another.

use std::sync::Arc;
use tracing::{error, info};

use super::errors::{SyncError, SyncResult};
use crate::domain::{FeedItem, PageSource};
use crate::infrastructure::parsing::{ListSelectors, PageParser, SpoilerListParser, SpoilerPage};

pub struct SpoilerCrawler {
    source: Arc<dyn PageSource>,
    parser: SpoilerListParser,
}

impl SpoilerCrawler {
    pub fn new(source: Arc<dyn PageSource>, selectors: &ListSelectors) -> SyncResult<Self> {
        Ok(Self {
            source,
            parser: SpoilerListParser::with_config(selectors)?,
        })
    }

    /// Fetch and parse a single listing page
    pub async fn fetch_page(&self, url: &str) -> SyncResult<SpoilerPage> {
        let markup = self.source.fetch_page(url).await.map_err(|e| {
            error!("Error fetching {}: {:#}", url, e);
            SyncError::fetch(url, &e)
        })?;
        Ok(self.parser.parse_str(&markup, url)?)
    }

    /// Every item from `start_url` onwards, in feed order.
    ///
    /// Any failed page aborts the whole crawl. Next links are followed
    /// without cycle detection.
    pub async fn crawl(&self, start_url: &str) -> SyncResult<Vec<FeedItem>> {
        let mut items = Vec::new();
        let mut next_url = Some(start_url.to_string());
        let mut pages = 0_usize;

        while let Some(url) = next_url.take() {
            let page = self.fetch_page(&url).await?;
            pages += 1;
            info!("Scraped {} cards.", page.items.len());

            items.extend(page.items);
            next_url = page.next_page_url;
        }

        info!("Crawled {} page(s) starting at {}", pages, start_url);
        Ok(items)
    }
}
