//! Image encoding: resume image bytes → base64 [`InlineImage`].
//!
//! Multimodal APIs accept images as base64 data-URIs embedded in the JSON
//! request body. The bytes are forwarded untouched (no re-encoding), but the
//! payload is sniffed first: a file declared `image/png` that is really a
//! GIF would otherwise cost a model call that is bound to fail.

use crate::document::ImageKind;
use crate::transport::InlineImage;
use image::ImageFormat;
use tracing::debug;

/// Wrap image bytes for the vision model.
///
/// Returns `None` when the magic bytes are not a JPEG or PNG. The declared
/// `kind` is only a hint; the sniffed format wins so the MIME type sent to
/// the API always matches the payload.
pub fn encode_image(bytes: &[u8], kind: ImageKind) -> Option<InlineImage> {
    let sniffed = match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => ImageKind::Jpeg,
        ImageFormat::Png => ImageKind::Png,
        _ => return None,
    };
    if sniffed != kind {
        debug!(
            "Declared {} but payload is {}; using payload type",
            kind.mime_type(),
            sniffed.mime_type()
        );
    }

    let encoded = InlineImage::from_bytes(bytes, sniffed.mime_type());
    debug!("Encoded image → {} bytes base64", encoded.base64.len());
    Some(encoded)
}
