//! Image encoding: `DynamicImage` ↔ base64 PNG data URL.
//!
//! Pages are stored in the gallery as `data:image/png;base64,…` strings: the
//! same value is shown as the thumbnail, sent verbatim as `imageData` to the
//! analysis endpoint, and decoded back to bytes when the page is downloaded.

use crate::error::GalleryError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use tracing::debug;

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+)(?:;[\w-]+=[\w.-]+)*;base64,(?P<data>.*)$")
        .expect("valid regex")
});

/// Encode a rasterised page as a PNG data URL.
///
/// PNG keeps text edges crisp; JPEG artefacts around glyphs hurt anything
/// that later reads the image.
pub fn encode_page(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(format!("data:image/png;base64,{b64}"))
}

/// A data URL split into its MIME type and decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Split a data URL into MIME type and base64 payload without decoding.
pub fn split_data_url(url: &str) -> Result<(&str, &str), GalleryError> {
    let caps = DATA_URL
        .captures(url)
        .ok_or_else(|| GalleryError::InvalidDataUrl("expected data:<mime>;base64,<payload>".into()))?;
    let mime = caps.name("mime").map_or("", |m| m.as_str());
    let data = caps.name("data").map_or("", |m| m.as_str());
    if data.is_empty() {
        return Err(GalleryError::InvalidDataUrl("empty payload".into()));
    }
    Ok((mime, data))
}

/// Decode a base64 data URL back into raw bytes.
pub fn decode_data_url(url: &str) -> Result<DecodedDataUrl, GalleryError> {
    let (mime, data) = split_data_url(url)?;
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| GalleryError::InvalidDataUrl(e.to_string()))?;
    Ok(DecodedDataUrl {
        mime_type: mime.to_string(),
        bytes,
    })
}
