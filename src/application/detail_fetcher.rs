//! Resolves a spoiler's detail page into its attributes

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use super::errors::{SyncError, SyncResult};
use crate::domain::{FeedItem, PageSource};
use crate::infrastructure::parsing::{CardDetailParser, DetailSelectors, PageParser};

pub struct DetailFetcher {
    source: Arc<dyn PageSource>,
    parser: CardDetailParser,
}

impl DetailFetcher {
    pub fn new(source: Arc<dyn PageSource>, selectors: &DetailSelectors) -> SyncResult<Self> {
        Ok(Self {
            source,
            parser: CardDetailParser::with_config(selectors)?,
        })
    }

    /// Attribute rows of the detail page keyed by lowercase name. Not retried.
    pub async fn fetch_details(&self, detail_url: &str) -> SyncResult<HashMap<String, String>> {
        info!("Getting card details at {}...", detail_url);
        let markup = self.source.fetch_page(detail_url).await.map_err(|e| {
            error!("Error fetching {}: {:#}", detail_url, e);
            SyncError::fetch(detail_url, &e)
        })?;
        Ok(self.parser.parse_str(&markup, detail_url)?)
    }

    /// The item with its detail attributes merged in
    pub async fn enrich(&self, item: FeedItem) -> SyncResult<FeedItem> {
        let attributes = self.fetch_details(&item.detail_url).await?;
        Ok(item.with_attributes(attributes))
    }
}
