//! Progress-callback trait for per-document screening events.
//!
//! Inject an [`Arc<dyn ScreeningProgressCallback>`] via
//! [`crate::config::ScreeningConfigBuilder::progress_callback`] to receive
//! one event per document as the batch advances. The library knows nothing
//! about how the host shows progress: a terminal bar, a log line, or a web
//! socket are all just implementations of this trait.
//!
//! # Example
//!
//! ```rust
//! use edgequake_screen::{RoutingOutcome, ScreeningConfig, ScreeningProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl ScreeningProgressCallback for Counter {
//!     fn on_document_routed(&self, _index: usize, _total: usize, _outcome: &RoutingOutcome) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ScreeningConfig::builder()
//!     .destinations("approved", "reproved")
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::DocumentError;
use crate::output::RoutingOutcome;
use std::sync::Arc;

/// Called by the orchestrator as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based. Documents are processed one
/// at a time, so events for a batch never interleave.
pub trait ScreeningProgressCallback: Send + Sync {
    /// Called once before the first document is fetched.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before a document is downloaded.
    fn on_document_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a document was scored and routed (card created or not).
    fn on_document_routed(&self, index: usize, total: usize, outcome: &RoutingOutcome) {
        let _ = (index, total, outcome);
    }

    /// Called when a document produced no outcome.
    fn on_document_skipped(&self, index: usize, total: usize, name: &str, reason: &DocumentError) {
        let _ = (index, total, name, reason);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total: usize, routed: usize) {
        let _ = (total, routed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScreeningProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScreeningConfig`].
pub type ProgressCallback = Arc<dyn ScreeningProgressCallback>;
