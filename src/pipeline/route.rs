//! Routing: threshold classification and the card a candidate becomes.

use crate::error::ScreenError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two outcome buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Approved,
    Reproved,
}

impl Bucket {
    /// Label used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Approved => "Aprovado",
            Bucket::Reproved => "Reprovado",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score. The threshold is an inclusive lower bound for Approved.
pub fn decide(score: u8, threshold: u8) -> Bucket {
    if score >= threshold {
        Bucket::Approved
    } else {
        Bucket::Reproved
    }
}

/// Card list ids for the two buckets. Always distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destinations {
    approved: String,
    reproved: String,
}

impl Destinations {
    pub fn new(approved: impl Into<String>, reproved: impl Into<String>) -> Result<Self, ScreenError> {
        let approved = approved.into();
        let reproved = reproved.into();
        if approved.trim().is_empty() || reproved.trim().is_empty() {
            return Err(ScreenError::InvalidConfig(
                "approved and reproved list ids must not be empty".into(),
            ));
        }
        if approved == reproved {
            return Err(ScreenError::SameDestination { list_id: approved });
        }
        Ok(Self { approved, reproved })
    }

    pub fn list_for(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::Approved => &self.approved,
            Bucket::Reproved => &self.reproved,
        }
    }
}

/// Title and description of the card created for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub title: String,
    pub description: String,
}

impl CardDraft {
    /// `"{name} - Nota: {score}"`, with the raw analysis as description.
    pub fn new(candidate_name: &str, score: u8, analysis: &str) -> Self {
        Self {
            title: format!("{} - Nota: {}", candidate_name, score),
            description: analysis.to_string(),
        }
    }
}

/// Display name used when the analysis does not name the candidate.
pub fn fallback_candidate_name(document_name: &str) -> String {
    format!("Candidato de '{}'", document_name)
}
