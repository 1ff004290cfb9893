//! Spoiler feed to board synchronization
//!
//! One run reads the board and crawls the feed concurrently, keeps the
//! spoilers the board does not have yet, enriches them from their detail
//! pages, files each under the list its color and type call for, and
//! creates the cards. Every target list is resolved before the first write.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::bounded::bounded_try_map;
use super::detail_fetcher::DetailFetcher;
use super::errors::{SyncError, SyncResult};
use super::spoiler_crawler::SpoilerCrawler;
use crate::domain::{
    BoardCard, BoardList, BoardRepository, BoardSnapshot, CardPosition, FeedItem, PageSource, filter_new_items,
    reject_basic_lands, target_list_name,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::ParsingConfig;

/// Settings of one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub board_id: String,
    pub start_url: String,
    pub max_new_cards: Option<usize>,
    pub detail_concurrency: usize,
    pub apply_concurrency: usize,
    pub dry_run: bool,
    pub card_position: CardPosition,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig, board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            start_url: config.feed.start_url.clone(),
            max_new_cards: config.feed.max_new_cards,
            detail_concurrency: config.pipeline.detail_concurrency,
            apply_concurrency: config.pipeline.apply_concurrency,
            dry_run: config.pipeline.dry_run,
            card_position: config.pipeline.card_position,
        }
    }
}

/// What happened to one planned write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Created { card_id: String },
    Commented { card_id: String },
    DryRun,
}

/// A new card and the list it is filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardOutcome {
    pub name: String,
    pub list_name: String,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

/// Summary of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Spoilers found in the feed, basic lands excluded
    pub total_spoilers: usize,
    pub board_cards: usize,
    pub new_cards: usize,
    pub dry_run: bool,
    pub cards: Vec<CardOutcome>,
}

struct PlannedCard {
    item: FeedItem,
    list: BoardList,
}

pub struct SyncPipeline {
    board: Arc<dyn BoardRepository>,
    crawler: SpoilerCrawler,
    details: DetailFetcher,
    settings: SyncSettings,
}

impl SyncPipeline {
    pub fn new(
        board: Arc<dyn BoardRepository>,
        source: Arc<dyn PageSource>,
        parsing: &ParsingConfig,
        settings: SyncSettings,
    ) -> SyncResult<Self> {
        Ok(Self {
            board,
            crawler: SpoilerCrawler::new(Arc::clone(&source), &parsing.list)?,
            details: DetailFetcher::new(source, &parsing.detail)?,
            settings,
        })
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub async fn run(&self) -> SyncResult<SyncReport> {
        let (lists, cards, spoilers) = tokio::try_join!(
            self.fetch_lists(),
            self.fetch_cards(),
            self.crawler.crawl(&self.settings.start_url),
        )?;

        let spoilers = reject_basic_lands(spoilers);
        info!("{} total spoilers found.", spoilers.len());
        info!("{} cards on board.", cards.len());

        let snapshot = BoardSnapshot::new(lists, cards);
        let total_spoilers = spoilers.len();
        let mut new_items = filter_new_items(spoilers, &snapshot.card_names());
        if let Some(limit) = self.settings.max_new_cards {
            new_items.truncate(limit);
        }

        let enriched = bounded_try_map(new_items, self.settings.detail_concurrency, |item| self.details.enrich(item)).await?;
        info!("{} new cards found.", enriched.len());

        let planned = plan_cards(enriched, &snapshot)?;
        let new_cards = planned.len();

        if self.settings.dry_run {
            info!("Dry run: no cards will be added to the board");
        }
        let outcomes = bounded_try_map(planned, self.settings.apply_concurrency, |card| self.apply(card)).await?;

        Ok(SyncReport {
            total_spoilers,
            board_cards: snapshot.cards.len(),
            new_cards,
            dry_run: self.settings.dry_run,
            cards: outcomes,
        })
    }

    async fn fetch_lists(&self) -> SyncResult<Vec<BoardList>> {
        self.board
            .fetch_lists(&self.settings.board_id)
            .await
            .map_err(|e| SyncError::board("get lists", &e))
    }

    async fn fetch_cards(&self) -> SyncResult<Vec<BoardCard>> {
        self.board
            .fetch_cards(&self.settings.board_id)
            .await
            .map_err(|e| SyncError::board("get cards", &e))
    }

    async fn apply(&self, planned: PlannedCard) -> SyncResult<CardOutcome> {
        let PlannedCard { item, list } = planned;
        info!("Adding {} to {} list.", item.name, list.name);

        let outcome = if self.settings.dry_run {
            ApplyOutcome::DryRun
        } else {
            let card = self
                .board
                .create_card(&item.name, &list.id, self.settings.card_position)
                .await
                .map_err(|e| SyncError::board("create card", &e))?;

            if item.image_url.is_empty() {
                warn!("No image to attach to {}", item.name);
            } else {
                self.board
                    .attach_url(&card.id, &item.image_url)
                    .await
                    .map_err(|e| SyncError::board("add attachment", &e))?;
            }
            debug!("Created card {} for {}", card.id, item.name);
            ApplyOutcome::Created { card_id: card.id }
        };

        Ok(CardOutcome {
            name: item.name,
            list_name: list.name,
            outcome,
        })
    }
}

/// Resolve the target list of every card, failing on the first one the
/// board has no list for.
fn plan_cards(items: Vec<FeedItem>, snapshot: &BoardSnapshot) -> SyncResult<Vec<PlannedCard>> {
    items
        .into_iter()
        .map(|item| {
            let list_name = target_list_name(&item);
            match snapshot.find_list(&list_name) {
                Some(list) => Ok(PlannedCard {
                    list: list.clone(),
                    item,
                }),
                None => Err(SyncError::ConfigurationFailure {
                    list: list_name,
                    card: item.name,
                }),
            }
        })
        .collect()
}
