//! Resume documents and the closed set of formats the extractor reads.

use crate::error::{DocumentError, ScreenError};
use serde::{Deserialize, Serialize};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// A document as listed by a [`crate::store::FileStore`]; bytes not fetched yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn with_bytes(self, bytes: Vec<u8>) -> Document {
        Document {
            id: self.id,
            name: self.name,
            mime_type: self.mime_type,
            bytes,
        }
    }
}

/// A downloaded document. Dropped as soon as its text is extracted.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Image subtypes the vision model is asked to transcribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => MIME_JPEG,
            ImageKind::Png => MIME_PNG,
        }
    }
}

/// How a document's text is obtained, decided from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Image(ImageKind),
}

impl DocumentKind {
    /// Classify a MIME type. Parameters (`; charset=utf-8`) and case are ignored.
    pub fn from_mime(mime_type: &str) -> Result<Self, DocumentError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Ok(DocumentKind::Pdf),
            MIME_JPEG | "image/jpg" | "image/pjpeg" => Ok(DocumentKind::Image(ImageKind::Jpeg)),
            MIME_PNG => Ok(DocumentKind::Image(ImageKind::Png)),
            t if t.starts_with("text/") => Ok(DocumentKind::PlainText),
            _ => Err(DocumentError::UnsupportedFormat {
                mime_type: mime_type.to_string(),
            }),
        }
    }
}

/// Validate the content types an operator asked to screen, before any
/// document is listed.
pub fn validate_content_types(content_types: &[String]) -> Result<(), ScreenError> {
    if content_types.is_empty() {
        return Err(ScreenError::InvalidConfig(
            "at least one content type is required".into(),
        ));
    }
    for t in content_types {
        DocumentKind::from_mime(t).map_err(|_| ScreenError::UnsupportedContentType {
            mime_type: t.clone(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_supported_types() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), Ok(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            Ok(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_mime("text/markdown"), Ok(DocumentKind::PlainText));
        assert_eq!(
            DocumentKind::from_mime("IMAGE/JPEG"),
            Ok(DocumentKind::Image(ImageKind::Jpeg))
        );
        assert_eq!(
            DocumentKind::from_mime("image/jpg"),
            Ok(DocumentKind::Image(ImageKind::Jpeg))
        );
        assert_eq!(
            DocumentKind::from_mime("image/png"),
            Ok(DocumentKind::Image(ImageKind::Png))
        );
    }

    #[test]
    fn rejects_other_image_subtypes() {
        for mime in ["image/gif", "image/webp", "image/tiff"] {
            assert_eq!(
                DocumentKind::from_mime(mime),
                Err(DocumentError::UnsupportedFormat {
                    mime_type: mime.into()
                })
            );
        }
    }

    #[test]
    fn rejects_office_documents() {
        assert!(DocumentKind::from_mime(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )
        .is_err());
    }

    #[test]
    fn validate_content_types_flags_gif() {
        let err = validate_content_types(&["application/pdf".into(), "image/gif".into()]).unwrap_err();
        assert!(matches!(err, ScreenError::UnsupportedContentType { mime_type } if mime_type == "image/gif"));
    }

    #[test]
    fn validate_content_types_requires_one() {
        assert!(validate_content_types(&[]).is_err());
    }

    #[test]
    fn document_debug_hides_payload() {
        let doc = DocumentRef::new("1", "cv.pdf", MIME_PDF).with_bytes(vec![0; 2048]);
        let dbg = format!("{doc:?}");
        assert!(dbg.contains("2048"));
        assert!(!dbg.contains("[0, 0"));
    }
}
