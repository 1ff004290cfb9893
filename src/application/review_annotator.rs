//! Set review annotation
//!
//! Scrapes every review article, pairs each review with its board card and
//! posts the rating and review text as a comment. A review without a card
//! stops the run before anything is posted.

use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::bounded::bounded_try_map;
use super::errors::{SyncError, SyncResult};
use super::sync_pipeline::ApplyOutcome;
use crate::domain::{BoardCard, BoardRepository, PageSource, RatingScale, Review, ReviewMatch, match_reviews};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::{PageParser, ReviewParser, ReviewSelectors};

/// Settings of one annotation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    pub board_id: String,
    pub review_urls: Vec<String>,
    pub review_limit: Option<usize>,
    pub reviewer_label: String,
    pub apply_concurrency: usize,
    pub dry_run: bool,
}

impl ReviewSettings {
    pub fn from_config(config: &AppConfig, board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            review_urls: config.reviews.urls.clone(),
            review_limit: config.reviews.limit,
            reviewer_label: config.reviews.reviewer_label.clone(),
            apply_concurrency: config.pipeline.apply_concurrency,
            dry_run: config.pipeline.dry_run,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationOutcome {
    pub review_name: String,
    pub card_name: String,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

/// Summary of an annotation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    pub reviews_scraped: usize,
    pub board_cards: usize,
    pub dry_run: bool,
    pub annotations: Vec<AnnotationOutcome>,
}

pub struct ReviewAnnotator {
    board: Arc<dyn BoardRepository>,
    source: Arc<dyn PageSource>,
    parser: ReviewParser,
    scale: RatingScale,
    settings: ReviewSettings,
}

impl ReviewAnnotator {
    pub fn new(
        board: Arc<dyn BoardRepository>,
        source: Arc<dyn PageSource>,
        selectors: &ReviewSelectors,
        settings: ReviewSettings,
    ) -> SyncResult<Self> {
        Ok(Self {
            board,
            source,
            parser: ReviewParser::with_config(selectors)?,
            scale: RatingScale::default(),
            settings,
        })
    }

    pub fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    /// Reviews of one article, in article order
    pub async fn fetch_reviews(&self, url: &str) -> SyncResult<Vec<Review>> {
        let markup = self.source.fetch_page(url).await.map_err(|e| {
            error!("Error fetching {}: {:#}", url, e);
            SyncError::fetch(url, &e)
        })?;
        Ok(self.parser.parse_str(&markup, url)?)
    }

    /// Reviews of every configured article, flattened in URL order and capped
    async fn fetch_all_reviews(&self) -> SyncResult<Vec<Review>> {
        let pages = try_join_all(self.settings.review_urls.iter().map(|url| self.fetch_reviews(url))).await?;
        let mut reviews: Vec<Review> = pages.into_iter().flatten().collect();
        if let Some(limit) = self.settings.review_limit {
            reviews.truncate(limit);
        }
        Ok(reviews)
    }

    async fn fetch_cards(&self) -> SyncResult<Vec<BoardCard>> {
        self.board
            .fetch_cards(&self.settings.board_id)
            .await
            .map_err(|e| SyncError::board("get cards", &e))
    }

    pub async fn run(&self) -> SyncResult<AnnotationReport> {
        let (cards, reviews) = tokio::try_join!(self.fetch_cards(), self.fetch_all_reviews())?;
        info!("Scraped {} reviews.", reviews.len());
        info!("{} cards on board.", cards.len());

        let reviews_scraped = reviews.len();
        let matches = match_reviews(reviews, &cards).map_err(|unmatched| {
            error!("Some review cards could not be matched to board cards:");
            for name in &unmatched {
                error!("  {}", name);
            }
            SyncError::ValidationFailure { unmatched }
        })?;
        info!("All review cards matched to board cards!");

        if self.settings.dry_run {
            info!("Dry run: no comments will be posted");
        }
        let annotations = bounded_try_map(matches, self.settings.apply_concurrency, |m| self.annotate(m)).await?;

        Ok(AnnotationReport {
            reviews_scraped,
            board_cards: cards.len(),
            dry_run: self.settings.dry_run,
            annotations,
        })
    }

    async fn annotate(&self, matched: ReviewMatch) -> SyncResult<AnnotationOutcome> {
        let ReviewMatch { review, card } = matched;
        let comment = self.scale.annotation(&self.settings.reviewer_label, &review);
        info!("Adding review of {} to card {}.", review.name, card.name);

        let outcome = if self.settings.dry_run {
            ApplyOutcome::DryRun
        } else {
            self.board
                .add_comment(&card.id, &comment)
                .await
                .map_err(|e| SyncError::board("add comment", &e))?;
            ApplyOutcome::Commented { card_id: card.id }
        };

        Ok(AnnotationOutcome {
            review_name: review.name,
            card_name: card.name,
            outcome,
        })
    }
}
