//! Input resolution: read a user-supplied path or URL into PDF bytes.
//!
//! The rasteriser works from an in-memory byte slice, so URLs are downloaded
//! straight into memory. The `%PDF` magic bytes are checked before returning
//! so callers get a meaningful error instead of a pdfium parse failure.

use crate::error::GalleryError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read `input` (local path or HTTP/HTTPS URL) into memory.
pub async fn load_pdf(input: &str, timeout_secs: u64) -> Result<Vec<u8>, GalleryError> {
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    check_magic(&bytes)?;
    Ok(bytes)
}

/// Reject anything that does not start with `%PDF`.
pub fn check_magic(bytes: &[u8]) -> Result<(), GalleryError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(GalleryError::NotAPdf {
            magic: bytes.iter().take(4).copied().collect(),
        });
    }
    Ok(())
}

async fn read_local(path_str: &str) -> Result<Vec<u8>, GalleryError> {
    let path = PathBuf::from(path_str);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(GalleryError::PermissionDenied { path })
        }
        Err(_) => Err(GalleryError::FileNotFound { path }),
    }
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, GalleryError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GalleryError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            GalleryError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            GalleryError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(GalleryError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| GalleryError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
