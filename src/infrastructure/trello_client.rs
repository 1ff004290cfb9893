//! Trello REST client
//!
//! Implements [`BoardRepository`] over the Trello v1 API. Credentials are
//! passed as `key`/`token` query parameters on every request.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BoardCard, BoardList, BoardRepository, CardPosition};

pub const DEFAULT_API_BASE: &str = "https://api.trello.com/1";

/// Trello connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrelloConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub user_token: Option<String>,
    pub board_id: Option<String>,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            user_token: None,
            board_id: None,
        }
    }
}

/// [`BoardRepository`] backed by the Trello API
pub struct TrelloClient {
    client: Client,
    api_base: String,
    api_key: String,
    user_token: String,
}

impl TrelloClient {
    pub fn new(client: Client, config: &TrelloConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| anyhow!("Trello API key is not configured"))?;
        let user_token = config
            .user_token
            .clone()
            .ok_or_else(|| anyhow!("Trello user token is not configured"))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            user_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", self.api_key.as_str()), ("token", self.user_token.as_str())])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> Result<T> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Trello {operation} request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Trello {} returned {}: {}", operation, status, body.trim()));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Trello {operation} returned an unexpected body"))
    }
}

#[async_trait]
impl BoardRepository for TrelloClient {
    async fn fetch_lists(&self, board_id: &str) -> Result<Vec<BoardList>> {
        let request = self.client.get(self.url(&format!("boards/{board_id}/lists")));
        let lists: Vec<BoardList> = self.send(request, "get lists").await?;
        debug!("Fetched {} lists from board {}", lists.len(), board_id);
        Ok(lists)
    }

    async fn fetch_cards(&self, board_id: &str) -> Result<Vec<BoardCard>> {
        let request = self.client.get(self.url(&format!("boards/{board_id}/cards")));
        let cards: Vec<BoardCard> = self.send(request, "get cards").await?;
        debug!("Fetched {} cards from board {}", cards.len(), board_id);
        Ok(cards)
    }

    async fn create_card(&self, name: &str, list_id: &str, position: CardPosition) -> Result<BoardCard> {
        let position = position.to_string();
        let request = self
            .client
            .post(self.url("cards"))
            .query(&[("name", name), ("idList", list_id), ("pos", position.as_str())]);
        self.send(request, "create card").await
    }

    async fn attach_url(&self, card_id: &str, url: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("cards/{card_id}/attachments")))
            .query(&[("url", url)]);
        let _: serde_json::Value = self.send(request, "add attachment").await?;
        Ok(())
    }

    async fn add_comment(&self, card_id: &str, text: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("cards/{card_id}/actions/comments")))
            .query(&[("text", text)]);
        let _: serde_json::Value = self.send(request, "add comment").await?;
        Ok(())
    }
}
