//! # pdf-gallery
//!
//! Turn a PDF into a gallery of page images, then have individual pages
//! analysed into markdown.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Upload   read bytes from a path, URL or caller
//!  ├─ 2. Render   rasterise pages in order via pdfium (spawn_blocking)
//!  ├─ 3. Encode   PNG → data URL, appended to the gallery as it lands
//!  ├─ 4. Analyse  one page at a time against the analysis endpoint
//!  └─ 5. Results  kept in request order; copy or delete each one
//! ```
//!
//! The [`server`] module ships a mock analysis endpoint that answers each
//! document type with fixed markdown after a short delay.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_gallery::{DocType, GalleryConfig, PageGallery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gallery = PageGallery::from_config(GalleryConfig::default())?;
//!     gallery.upload_file("document.pdf").await?;
//!     if let Some(result) = gallery.analyze(0, DocType::Invoice).await? {
//!         println!("{}\n\n{}", result.heading(), result.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-gallery` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod doc_type;
pub mod error;
pub mod gallery;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use config::{GalleryConfig, GalleryConfigBuilder, ServerConfig, DEFAULT_ENDPOINT_URL};
pub use doc_type::{DocType, UnknownDocType};
pub use error::{ErrorScope, GalleryError};
pub use gallery::{GalleryState, PageGallery};
pub use model::{
    AnalysisResult, Direction, GallerySnapshot, Notification, NotificationLevel, PageImage,
    ReadingView,
};
pub use pipeline::analyze::{Analyzer, HttpAnalyzer, LlmAnalyzer};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer, RenderEvent};
pub use progress::{GalleryProgressCallback, NoopProgressCallback, ProgressCallback};
