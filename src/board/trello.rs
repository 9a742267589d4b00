//! Trello REST adapter.
//!
//! Credentials travel as `key` and `token` query parameters on every call,
//! which is how Trello authenticates API keys.

use super::{Board, Card, CardBoard, CardList};
use crate::error::{BoardError, ScreenError};
use crate::pipeline::route::CardDraft;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const TRELLO_API: &str = "https://api.trello.com/1";

/// [`CardBoard`] over the Trello REST API.
pub struct TrelloBoard {
    client: Client,
    api_key: String,
    token: String,
    base_url: String,
}

impl TrelloBoard {
    pub fn new(
        api_key: impl Into<String>,
        token: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ScreenError> {
        let api_key = api_key.into();
        let token = token.into();
        for (name, value) in [("TRELLO_API_KEY", &api_key), ("TRELLO_TOKEN", &token)] {
            if value.trim().is_empty() {
                return Err(ScreenError::MissingCredential {
                    name: name.into(),
                    hint: format!("export {name}=... (see https://trello.com/app-key)"),
                });
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| ScreenError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            token,
            base_url: TRELLO_API.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.query(&[("key", self.api_key.as_str()), ("token", self.token.as_str())])
    }

    /// Send, check status, decode JSON. `endpoint` is the path only so that
    /// errors never carry credentials.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, BoardError> {
        let resp = self.authed(req).send().await.map_err(|e| BoardError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: e.without_url().to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(BoardError::BadStatus {
                endpoint: endpoint.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| BoardError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: e.without_url().to_string(),
        })
    }
}

#[async_trait]
impl CardBoard for TrelloBoard {
    async fn list_boards(&self) -> Result<Vec<Board>, BoardError> {
        let path = "/members/me/boards";
        let req = self
            .client
            .get(self.url(path))
            .query(&[("fields", "id,name"), ("filter", "open")]);
        let boards: Vec<Board> = self.send_json(req, path).await?;
        debug!("Trello: {} boards", boards.len());
        Ok(boards)
    }

    async fn list_lists(&self, board_id: &str) -> Result<Vec<CardList>, BoardError> {
        let path = format!("/boards/{board_id}/lists");
        let req = self
            .client
            .get(self.url(&path))
            .query(&[("fields", "id,name"), ("filter", "open")]);
        self.send_json(req, &path).await
    }

    async fn create_card(&self, list_id: &str, draft: &CardDraft) -> Result<Card, BoardError> {
        let path = "/cards";
        let req = self.client.post(self.url(path)).form(&card_form(list_id, draft));
        let card: Card = self.send_json(req, path).await?;
        info!("Trello: card '{}' created in list {}", card.name, list_id);
        Ok(card)
    }
}

fn card_form<'a>(list_id: &'a str, draft: &'a CardDraft) -> [(&'static str, &'a str); 3] {
    [
        ("idList", list_id),
        ("name", draft.title.as_str()),
        ("desc", draft.description.as_str()),
    ]
}
