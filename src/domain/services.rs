//! Collaborator interfaces
//!
//! The pipelines only talk to the outside world through these traits.
//! `infrastructure` provides the Trello and reqwest implementations; the
//! tests provide in-memory ones.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::board::{BoardCard, BoardList};

/// Where a new card is placed within its list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardPosition {
    #[default]
    Top,
    Bottom,
}

impl fmt::Display for CardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// Read/write access to the managed board
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn fetch_lists(&self, board_id: &str) -> Result<Vec<BoardList>>;
    async fn fetch_cards(&self, board_id: &str) -> Result<Vec<BoardCard>>;
    async fn create_card(&self, name: &str, list_id: &str, position: CardPosition) -> Result<BoardCard>;
    async fn attach_url(&self, card_id: &str, url: &str) -> Result<()>;
    async fn add_comment(&self, card_id: &str, text: &str) -> Result<()>;
}

/// Raw page markup by URL.
///
/// Returns the markup as a string; callers parse it with `scraper::Html`
/// after the await since `Html` is not `Send`.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
