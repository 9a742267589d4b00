//! Error types for the edgequake-screen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScreenError`] is **fatal**: the run cannot start at all (bad
//!   configuration, missing credentials, provider not configured), or a side
//!   command such as prompt generation failed. Never raised from inside a
//!   running batch.
//!
//! * [`DocumentError`] is **non-fatal**: a single resume could not be
//!   downloaded, read or scored. The document is skipped, the reason is kept
//!   in [`crate::output::SkippedDocument`], and the batch moves on.
//!
//! Collaborator adapters have their own small error types
//! ([`StoreError`], [`BoardError`], [`TransportError`]) so that the
//! orchestrator decides how each failure degrades.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-screen library.
#[derive(Debug, Error)]
pub enum ScreenError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Approved and reproved candidates would land in the same list.
    #[error("Approved and reproved lists must differ (both are '{list_id}')")]
    SameDestination { list_id: String },

    /// The operator asked to screen a content type the extractor cannot read.
    #[error("Unsupported content type '{mime_type}'\nSupported: application/pdf, text/*, image/jpeg, image/png")]
    UnsupportedContentType { mime_type: String },

    /// A credential needed by a collaborator is missing.
    #[error("Missing credential: {name}\nSet it with {hint}.")]
    MissingCredential { name: String, hint: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM call for a side command (rubric generation) failed.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read or write an evaluation prompt file.
    #[error("Prompt file '{path}': {source}")]
    PromptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Collaborator errors ───────────────────────────────────────────────
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A non-fatal error for a single document.
///
/// Stored in [`crate::output::SkippedDocument`]; the batch continues.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The store could not deliver the document bytes.
    #[error("download failed: {detail}")]
    DownloadFailed { detail: String },

    /// The declared content type is not one the extractor handles.
    #[error("unsupported format '{mime_type}'")]
    UnsupportedFormat { mime_type: String },

    /// Extraction finished but produced no text.
    #[error("no text could be extracted")]
    EmptyText,

    /// The scoring model produced no analysis.
    #[error("scoring failed")]
    ScoringFailed,
}

/// Failure reported by a [`crate::store::FileStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File store request to '{endpoint}' failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("File store returned HTTP {status} for '{endpoint}'")]
    BadStatus { endpoint: String, status: u16 },

    #[error("File store I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Folder or document '{id}' not found")]
    NotFound { id: String },
}

/// Failure reported by a [`crate::board::CardBoard`].
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card board request to '{endpoint}' failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Card board returned HTTP {status} for '{endpoint}'")]
    BadStatus { endpoint: String, status: u16 },
}

/// Failure reported by a [`crate::transport::ModelTransport`].
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("provider for model '{model}' unavailable: {detail}")]
    Provider { model: String, detail: String },

    #[error("model '{model}' call failed: {detail}")]
    Call { model: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_destination_display() {
        let e = ScreenError::SameDestination {
            list_id: "abc123".into(),
        };
        assert!(e.to_string().contains("abc123"));
    }

    #[test]
    fn unsupported_content_type_lists_supported_types() {
        let e = ScreenError::UnsupportedContentType {
            mime_type: "image/gif".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("image/gif"), "got: {msg}");
        assert!(msg.contains("image/png"), "got: {msg}");
    }

    #[test]
    fn document_error_serialises() {
        let e = DocumentError::UnsupportedFormat {
            mime_type: "image/gif".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("image/gif"));
    }

    #[test]
    fn store_error_converts_into_fatal() {
        let e: ScreenError = StoreError::NotFound { id: "f1".into() }.into();
        assert!(e.to_string().contains("f1"));
    }
}
