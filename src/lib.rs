//! # edgequake-screen
//!
//! Screen resumes with language models and route each candidate to an
//! "approved" or "reproved" list on a card board.
//!
//! ## Why this crate?
//!
//! Reading a few hundred resumes against the same job profile is slow and
//! inconsistent by hand. This crate applies one rubric to every resume in a
//! folder, asks a model for a reasoned analysis ending in a 0–100 score, and
//! files a card per candidate on the right side of a threshold. One bad file
//! or flaky API call costs one candidate, never the batch.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder
//!  │
//!  ├─ 1. List      FileStore (Google Drive, local directory)
//!  ├─ 2. Extract   PDF text layer (pdfium) / UTF-8 text / vision OCR for JPEG+PNG
//!  ├─ 3. Score     rubric (system) + resume (user) → free-text analysis
//!  ├─ 4. Parse     "Nome do candidato:" and "Nota final:" → (name, 0–100)
//!  ├─ 5. Route     score ≥ threshold → Approved, else Reproved
//!  └─ 6. Card      CardBoard::create_card (Trello) + BatchReport
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_screen::{DriveStore, LlmTransport, Screener, ScreeningConfig, TrelloBoard};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let screener = Screener::new(
//!         Arc::new(DriveStore::new(std::env::var("GOOGLE_DRIVE_TOKEN")?, 30)?),
//!         Arc::new(TrelloBoard::new(
//!             std::env::var("TRELLO_API_KEY")?,
//!             std::env::var("TRELLO_TOKEN")?,
//!             30,
//!         )?),
//!         Arc::new(LlmTransport::new(None)),
//!     );
//!
//!     let config = ScreeningConfig::builder()
//!         .destinations("approved-list-id", "reproved-list-id")
//!         .threshold(80)
//!         .build()?;
//!
//!     let report = screener
//!         .screen_folder("drive-folder-id", &["application/pdf".to_string()], &config)
//!         .await?;
//!     for o in &report.outcomes {
//!         println!("{} - Nota: {} → {}", o.candidate_name, o.score, o.bucket);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cvscreen` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-screen = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod board;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod screen;
pub mod store;
pub mod stream;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use board::{Board, Card, CardBoard, CardList, TrelloBoard};
pub use config::{ScreeningConfig, ScreeningConfigBuilder};
pub use document::{Document, DocumentKind, DocumentRef};
pub use error::{BoardError, DocumentError, ScreenError, StoreError, TransportError};
pub use output::{BatchReport, BatchStats, RoutingOutcome, SkippedDocument};
pub use pipeline::compose::generate_prompt;
pub use pipeline::parse::{parse_analysis, ParsedResult};
pub use pipeline::route::{Bucket, CardDraft, Destinations};
pub use progress::{NoopProgressCallback, ProgressCallback, ScreeningProgressCallback};
pub use prompts::EvaluationPrompt;
pub use screen::Screener;
pub use store::{DriveStore, FileStore, Folder, LocalStore};
pub use stream::OutcomeStream;
pub use transport::{LlmTransport, Message, ModelTransport};
