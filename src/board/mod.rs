//! Card boards: where routed candidates end up.
//!
//! The orchestrator only calls [`CardBoard::create_card`]; listing boards
//! and lists exists so the CLI can help an operator find list ids.

pub mod trello;

use crate::error::BoardError;
use crate::pipeline::route::CardDraft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use trello::TrelloBoard;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardList {
    pub id: String,
    pub name: String,
}

/// A card the board accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Card-tracking board.
#[async_trait]
pub trait CardBoard: Send + Sync {
    async fn list_boards(&self) -> Result<Vec<Board>, BoardError>;

    async fn list_lists(&self, board_id: &str) -> Result<Vec<CardList>, BoardError>;

    /// Create one card in `list_id`.
    async fn create_card(&self, list_id: &str, draft: &CardDraft) -> Result<Card, BoardError>;
}
