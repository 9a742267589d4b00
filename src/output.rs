//! Result types produced by a screening batch.

use crate::error::DocumentError;
use crate::pipeline::route::Bucket;
use serde::{Deserialize, Serialize};

/// The routed result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub document_id: String,
    pub document_name: String,
    /// Parsed name, or `Candidato de '{document_name}'` when the analysis had none.
    pub candidate_name: String,
    pub score: u8,
    pub bucket: Bucket,
    /// False when the board rejected the card; the candidate was still evaluated.
    pub card_created: bool,
    pub card_id: Option<String>,
}

/// A document that produced no outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub document_id: String,
    pub document_name: String,
    pub reason: DocumentError,
}

/// Aggregate counters for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub routed: usize,
    pub skipped: usize,
    pub approved: usize,
    pub reproved: usize,
    /// Outcomes whose card could not be created.
    pub cards_failed: usize,
    pub duration_ms: u64,
}

/// Everything an eager run returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<RoutingOutcome>,
    pub skipped: Vec<SkippedDocument>,
    pub stats: BatchStats,
}

impl BatchReport {
    pub(crate) fn tally(
        outcomes: Vec<RoutingOutcome>,
        skipped: Vec<SkippedDocument>,
        duration_ms: u64,
    ) -> Self {
        let approved = outcomes.iter().filter(|o| o.bucket == Bucket::Approved).count();
        let stats = BatchStats {
            total_documents: outcomes.len() + skipped.len(),
            routed: outcomes.len(),
            skipped: skipped.len(),
            approved,
            reproved: outcomes.len() - approved,
            cards_failed: outcomes.iter().filter(|o| !o.card_created).count(),
            duration_ms,
        };
        Self {
            outcomes,
            skipped,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(bucket: Bucket, card_created: bool) -> RoutingOutcome {
        RoutingOutcome {
            document_id: "id".into(),
            document_name: "cv.pdf".into(),
            candidate_name: "Ana".into(),
            score: 50,
            bucket,
            card_created,
            card_id: None,
        }
    }

    #[test]
    fn tally_counts_buckets_and_failures() {
        let report = BatchReport::tally(
            vec![
                outcome(Bucket::Approved, true),
                outcome(Bucket::Reproved, false),
                outcome(Bucket::Reproved, true),
            ],
            vec![SkippedDocument {
                document_id: "x".into(),
                document_name: "x.pdf".into(),
                reason: DocumentError::EmptyText,
            }],
            12,
        );
        assert_eq!(report.stats.total_documents, 4);
        assert_eq!(report.stats.routed, 3);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.approved, 1);
        assert_eq!(report.stats.reproved, 2);
        assert_eq!(report.stats.cards_failed, 1);
    }

    #[test]
    fn report_serialises_to_json() {
        let report = BatchReport::tally(vec![outcome(Bucket::Approved, true)], vec![], 0);
        let json = serde_json::to_string(&report).expect("serialise");
        assert!(json.contains("\"bucket\":\"approved\""), "got: {json}");
    }
}
