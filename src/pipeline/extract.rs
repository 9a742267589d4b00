//! Text extraction: one resume document → plain text.
//!
//! Dispatch is on the declared content type ([`DocumentKind`]):
//!
//! | Kind | Strategy |
//! |------|----------|
//! | PDF | pdfium text layer of every page, concatenated, trimmed |
//! | Plain text | UTF-8 decode, verbatim |
//! | JPEG / PNG | vision model transcription |
//!
//! An unsupported content type is the only error and is raised before any
//! network call. Every other failure (corrupt PDF, invalid UTF-8, model
//! error, timeout) is logged and yields an empty string: extraction failure
//! is never fatal to the batch.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state that is not safe to
//! drive from async contexts. The PDF branch runs on tokio's blocking pool.

use crate::document::{Document, DocumentKind, ImageKind};
use crate::error::DocumentError;
use crate::pipeline::encode;
use crate::prompts::IMAGE_TRANSCRIPTION_PROMPT;
use crate::transport::{Message, ModelTransport};
use pdfium_render::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Converts documents to text; holds what the image branch needs.
#[derive(Clone)]
pub struct TextExtractor {
    transport: Arc<dyn ModelTransport>,
    vision_model: String,
    timeout: Duration,
}

impl TextExtractor {
    pub fn new(transport: Arc<dyn ModelTransport>, vision_model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            vision_model: vision_model.into(),
            timeout,
        }
    }

    /// Extract the text of `document`, consuming it.
    ///
    /// `Ok("")` signals a failed extraction; `Err` only for
    /// [`DocumentError::UnsupportedFormat`].
    pub async fn extract(&self, document: Document) -> Result<String, DocumentError> {
        let kind = DocumentKind::from_mime(&document.mime_type)?;
        debug!("Extracting '{}' as {:?}", document.name, kind);

        let text = match kind {
            DocumentKind::Pdf => extract_pdf(document).await,
            DocumentKind::PlainText => decode_text(&document),
            DocumentKind::Image(image_kind) => self.transcribe_image(&document, image_kind).await,
        };
        Ok(text)
    }

    async fn transcribe_image(&self, document: &Document, kind: ImageKind) -> String {
        let Some(image) = encode::encode_image(&document.bytes, kind) else {
            warn!(
                "'{}' is declared {} but is not a readable JPEG/PNG",
                document.name, document.mime_type
            );
            return String::new();
        };

        let messages = [Message::user_with_image(IMAGE_TRANSCRIPTION_PROMPT, image)];
        let call = self.transport.complete(&messages, &self.vision_model);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) => text.trim().to_string(),
            Ok(Err(e)) => {
                warn!("Image transcription failed for '{}': {}", document.name, e);
                String::new()
            }
            Err(_) => {
                warn!(
                    "Image transcription timed out after {}s for '{}'",
                    self.timeout.as_secs(),
                    document.name
                );
                String::new()
            }
        }
    }
}

fn decode_text(document: &Document) -> String {
    match std::str::from_utf8(&document.bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!("'{}' is not valid UTF-8: {}", document.name, e);
            String::new()
        }
    }
}

async fn extract_pdf(document: Document) -> String {
    let name = document.name;
    let bytes = document.bytes;

    match tokio::task::spawn_blocking(move || pdf_text_blocking(&bytes)).await {
        Ok(Ok(text)) => {
            if text.is_empty() {
                warn!("'{}' has no text layer (scanned PDF?)", name);
            }
            text
        }
        Ok(Err(detail)) => {
            warn!("Could not extract text from PDF '{}': {}", name, detail);
            String::new()
        }
        Err(e) => {
            warn!("PDF extraction task for '{}' panicked: {}", name, e);
            String::new()
        }
    }
}

/// Blocking implementation of PDF text extraction.
fn pdf_text_blocking(bytes: &[u8]) -> Result<String, String> {
    let pdfium = bind_pdfium().map_err(|e| format!("pdfium unavailable: {:?}", e))?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| format!("{:?}", e))?;

    let mut pages = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| format!("page {}: {:?}", idx + 1, e))?;
        pages.push(text.all());
    }
    debug!("PDF text layer read from {} pages", pages.len());

    Ok(join_pages(pages))
}

/// Concatenate page texts in order and trim the whole.
fn join_pages(pages: impl IntoIterator<Item = String>) -> String {
    pages.into_iter().collect::<String>().trim().to_string()
}

/// Bind to pdfium: `PDFIUM_LIB_PATH`, then the working directory, then the
/// system library path.
fn bind_pdfium() -> Result<Pdfium, PdfiumError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(path)?,
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())?,
    };
    Ok(Pdfium::new(bindings))
}
