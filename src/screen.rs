//! Batch orchestration: drive every document through the pipeline.
//!
//! ## Failure isolation
//!
//! A batch never aborts because of one document. Each document ends in
//! exactly one [`Step`]:
//!
//! ```text
//! listed ─▶ downloaded ─▶ text ─▶ analysis ─▶ parsed ─▶ routed ─▶ card attempted
//! ```
//!
//! | Failure | Result |
//! |---------|--------|
//! | unsupported format, download error | skip |
//! | empty text, no analysis | skip |
//! | card rejected | outcome with `card_created = false` |
//!
//! Skips are kept in [`BatchReport::skipped`]; routed documents become
//! [`RoutingOutcome`]s. Documents are processed strictly one at a time, in
//! listing order.

use crate::board::CardBoard;
use crate::config::ScreeningConfig;
use crate::document::{validate_content_types, DocumentKind, DocumentRef};
use crate::error::{DocumentError, ScreenError};
use crate::output::{BatchReport, RoutingOutcome, SkippedDocument};
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::parse::parse_analysis;
use crate::pipeline::route::{decide, fallback_candidate_name, CardDraft};
use crate::pipeline::score::ScoringClient;
use crate::store::FileStore;
use crate::transport::ModelTransport;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Terminal state of one document.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Routed(RoutingOutcome),
    Skipped(SkippedDocument),
}

/// Per-batch pipeline stages, built once from the config.
#[derive(Clone)]
pub(crate) struct BatchContext {
    extractor: TextExtractor,
    scorer: ScoringClient,
}

impl BatchContext {
    pub(crate) fn new(transport: &Arc<dyn ModelTransport>, config: &ScreeningConfig) -> Self {
        let timeout = Duration::from_secs(config.api_timeout_secs);
        Self {
            extractor: TextExtractor::new(Arc::clone(transport), config.vision_model.clone(), timeout),
            scorer: ScoringClient::new(Arc::clone(transport), config.scoring_model.clone(), timeout),
        }
    }
}

/// Wires a file store, a card board and a model transport together.
///
/// ```rust,no_run
/// use edgequake_screen::{LlmTransport, LocalStore, Screener, ScreeningConfig, TrelloBoard};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let screener = Screener::new(
///     Arc::new(LocalStore::new("./curriculos")),
///     Arc::new(TrelloBoard::new("key", "token", 30)?),
///     Arc::new(LlmTransport::new(None)),
/// );
/// let config = ScreeningConfig::builder()
///     .destinations("approved-list-id", "reproved-list-id")
///     .build()?;
/// let report = screener
///     .screen_folder("vaga-dados", &["application/pdf".to_string()], &config)
///     .await?;
/// println!("{} routed, {} skipped", report.stats.routed, report.stats.skipped);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Screener {
    pub(crate) store: Arc<dyn FileStore>,
    pub(crate) board: Arc<dyn CardBoard>,
    pub(crate) transport: Arc<dyn ModelTransport>,
}

impl Screener {
    pub fn new(
        store: Arc<dyn FileStore>,
        board: Arc<dyn CardBoard>,
        transport: Arc<dyn ModelTransport>,
    ) -> Self {
        Self {
            store,
            board,
            transport,
        }
    }

    /// List `folder_id` and screen every matching document.
    ///
    /// Unsupported `content_types` are a configuration error. A listing
    /// failure is not: it is logged and the batch is empty.
    pub async fn screen_folder(
        &self,
        folder_id: &str,
        content_types: &[String],
        config: &ScreeningConfig,
    ) -> Result<BatchReport, ScreenError> {
        validate_content_types(content_types)?;

        let documents = match self.store.list_documents(folder_id, content_types).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Could not list folder '{}': {}; nothing to screen", folder_id, e);
                Vec::new()
            }
        };

        Ok(self.run(&documents, config).await)
    }

    /// Screen `documents` in order and return everything at once.
    pub async fn run(&self, documents: &[DocumentRef], config: &ScreeningConfig) -> BatchReport {
        let start = Instant::now();
        let total = documents.len();
        info!(
            "Screening {} documents (threshold {}, model {})",
            total, config.threshold, config.scoring_model
        );

        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_start(total);
        }

        let ctx = BatchContext::new(&self.transport, config);
        let ctx = &ctx;

        let (outcomes, skipped) = stream::iter(documents.iter().enumerate())
            .then(move |(idx, doc)| self.process_document(ctx, doc, idx + 1, total, config))
            .fold(
                (Vec::<RoutingOutcome>::new(), Vec::<SkippedDocument>::new()),
                |(mut outcomes, mut skipped), step| async move {
                    match step {
                        Step::Routed(outcome) => outcomes.push(outcome),
                        Step::Skipped(skip) => skipped.push(skip),
                    }
                    (outcomes, skipped)
                },
            )
            .await;

        let report = BatchReport::tally(outcomes, skipped, start.elapsed().as_millis() as u64);
        info!(
            "Batch complete: {}/{} routed ({} approved, {} reproved), {} skipped, {}ms",
            report.stats.routed,
            total,
            report.stats.approved,
            report.stats.reproved,
            report.stats.skipped,
            report.stats.duration_ms
        );

        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(total, report.stats.routed);
        }
        report
    }

    /// Take one document from listing to outcome.
    pub(crate) async fn process_document(
        &self,
        ctx: &BatchContext,
        doc: &DocumentRef,
        index: usize,
        total: usize,
        config: &ScreeningConfig,
    ) -> Step {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, &doc.name);
        }

        let step = match self.evaluate(ctx, doc, config).await {
            Ok(outcome) => Step::Routed(outcome),
            Err(reason) => {
                warn!("[{}/{}] Skipping '{}': {}", index, total, doc.name, reason);
                Step::Skipped(SkippedDocument {
                    document_id: doc.id.clone(),
                    document_name: doc.name.clone(),
                    reason,
                })
            }
        };

        if let Some(ref cb) = config.progress_callback {
            match &step {
                Step::Routed(outcome) => cb.on_document_routed(index, total, outcome),
                Step::Skipped(skip) => cb.on_document_skipped(index, total, &skip.document_name, &skip.reason),
            }
        }
        step
    }

    async fn evaluate(
        &self,
        ctx: &BatchContext,
        doc: &DocumentRef,
        config: &ScreeningConfig,
    ) -> Result<RoutingOutcome, DocumentError> {
        // Refuse unreadable formats before spending a download on them.
        DocumentKind::from_mime(&doc.mime_type)?;

        let bytes = self
            .store
            .download(&doc.id)
            .await
            .map_err(|e| DocumentError::DownloadFailed { detail: e.to_string() })?;
        debug!("Downloaded '{}' ({} bytes)", doc.name, bytes.len());

        let text = ctx.extractor.extract(doc.clone().with_bytes(bytes)).await?;
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyText);
        }

        let analysis = ctx
            .scorer
            .score(&config.prompt, &text)
            .await
            .ok_or(DocumentError::ScoringFailed)?;

        let parsed = parse_analysis(&analysis);
        let candidate_name = parsed
            .candidate_name
            .unwrap_or_else(|| fallback_candidate_name(&doc.name));
        let bucket = decide(parsed.score, config.threshold);
        let list_id = config.destinations.list_for(bucket);
        let draft = CardDraft::new(&candidate_name, parsed.score, &analysis);

        let card_id = match self.board.create_card(list_id, &draft).await {
            Ok(card) => Some(card.id),
            Err(e) => {
                warn!("Card for '{}' was not created: {}", candidate_name, e);
                None
            }
        };

        info!(
            "'{}' → {} ({}) as {}",
            doc.name, parsed.score, bucket, candidate_name
        );

        Ok(RoutingOutcome {
            document_id: doc.id.clone(),
            document_name: doc.name.clone(),
            candidate_name,
            score: parsed.score,
            bucket,
            card_created: card_id.is_some(),
            card_id,
        })
    }
}
