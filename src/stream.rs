//! Streaming screening API: emit outcomes as documents are routed.
//!
//! A batch of a few hundred resumes takes a while, one model call each.
//! [`Screener::stream`] yields every [`RoutingOutcome`] as soon as its card
//! was attempted, so a host can show results live or stop early.
//!
//! The stream is lazy: nothing is downloaded until it is polled. Each call
//! to `stream` starts again from the first document. Skipped documents are
//! not yielded; the per-document progress events still report them. Batch
//! start/complete events are only fired by the eager [`Screener::run`].

use crate::config::ScreeningConfig;
use crate::document::DocumentRef;
use crate::output::RoutingOutcome;
use crate::screen::{BatchContext, Screener, Step};
use futures::future;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;

/// A boxed stream of routing outcomes, borrowing the screener and config.
pub type OutcomeStream<'a> = Pin<Box<dyn Stream<Item = RoutingOutcome> + Send + 'a>>;

impl Screener {
    /// Screen `documents` in order, yielding outcomes one by one.
    ///
    /// # Example
    /// ```rust,no_run
    /// use edgequake_screen::{DocumentRef, Screener, ScreeningConfig};
    /// use futures::StreamExt;
    ///
    /// # async fn demo(screener: Screener, docs: Vec<DocumentRef>) -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ScreeningConfig::builder().destinations("ok", "nok").build()?;
    /// let mut outcomes = screener.stream(&docs, &config);
    /// while let Some(o) = outcomes.next().await {
    ///     println!("{} - Nota: {} → {}", o.candidate_name, o.score, o.bucket);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn stream<'a>(
        &'a self,
        documents: &'a [DocumentRef],
        config: &'a ScreeningConfig,
    ) -> OutcomeStream<'a> {
        let total = documents.len();
        let ctx = BatchContext::new(&self.transport, config);

        let steps = stream::iter(documents.iter().enumerate()).then(move |(idx, doc)| {
            let ctx = ctx.clone();
            async move { self.process_document(&ctx, doc, idx + 1, total, config).await }
        });

        Box::pin(steps.filter_map(|step| {
            future::ready(match step {
                Step::Routed(outcome) => Some(outcome),
                Step::Skipped(_) => None,
            })
        }))
    }
}
