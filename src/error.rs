//! Error types for the pdf-gallery library.
//!
//! Every gallery operation returns `Result<_, GalleryError>`. The controller
//! also keeps a persistent error banner for the three user-facing failure
//! scopes (upload, analysis, download); [`ErrorScope`] supplies the prefix
//! each banner message starts with.
//!
//! Clipboard failures are deliberately absent from the banner: they surface
//! as a transient [`crate::model::Notification`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-gallery library.
#[derive(Debug, Error)]
pub enum GalleryError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes were read, but they are not a PDF.
    #[error("Not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The rasteriser could not parse the document.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF")]
    WrongPassword,

    /// Page index does not exist in the gallery.
    #[error("Page {page} is out of range (gallery has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Image errors ──────────────────────────────────────────────────────
    /// A rendered page could not be PNG-encoded.
    #[error("Image encoding failed for page {page}: {detail}")]
    EncodingFailed { page: usize, detail: String },

    /// A stored page image is not a well-formed base64 data URL.
    #[error("Invalid image data URL: {0}")]
    InvalidDataUrl(String),

    // ── Analysis errors ───────────────────────────────────────────────────
    /// The analysis endpoint answered with a non-success status.
    #[error("Failed to analyze image (HTTP {status}): {detail}")]
    AnalysisRejected { status: u16, detail: String },

    /// The analysis request never produced a usable response.
    #[error("Failed to analyze image: {0}")]
    AnalysisFailed(String),

    /// The LLM provider is not configured (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not write a downloaded page image.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system clipboard refused the text.
    #[error("Failed to copy text: {0}")]
    ClipboardFailed(String),

    // ── Server errors ─────────────────────────────────────────────────────
    /// The mock analysis endpoint could not bind or serve.
    #[error("Analysis server error: {0}")]
    Server(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which user action a banner error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Upload,
    Analysis,
    Download,
}

impl ErrorScope {
    pub fn prefix(self) -> &'static str {
        match self {
            ErrorScope::Upload => "Error converting PDF to images: ",
            ErrorScope::Analysis => "Error analyzing image: ",
            ErrorScope::Download => "Error downloading image: ",
        }
    }

    /// Format the banner text shown for `err`.
    pub fn banner(self, err: &GalleryError) -> String {
        format!("{}{}", self.prefix(), err)
    }
}
