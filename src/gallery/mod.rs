//! The page gallery controller.
//!
//! [`PageGallery`] owns the gallery state and mediates every user action:
//! upload, delete, analyse, download, the reading view, and copying or
//! deleting results. It is cheap to clone; clones share one state.
//!
//! ## Concurrency
//!
//! State lives behind a `std::sync::Mutex` that is only ever held for a
//! single synchronous transition, never across an `.await`. Two flags guard
//! the asynchronous work:
//!
//! * `converting` — one upload at a time; pages are rendered strictly in
//!   order on one blocking thread and appended in that order.
//! * `analyzing`  — one analysis in flight globally. A second trigger while
//!   it is set returns `Ok(None)` without dispatching anything.
//!
//! If a caller drops an in-progress future the corresponding flag is cleared
//! so the gallery never wedges.

mod state;

pub use state::GalleryState;

use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::GalleryConfig;
use crate::doc_type::DocType;
use crate::error::{ErrorScope, GalleryError};
use crate::model::{
    AnalysisResult, Direction, GallerySnapshot, Notification, NotificationLevel, PageImage,
};
use crate::pipeline::analyze::{Analyzer, HttpAnalyzer};
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer, RenderEvent};
use crate::pipeline::{encode, input};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Shown when a copy succeeds.
pub const COPY_SUCCESS_MESSAGE: &str = "Analysis copied to clipboard!";
/// Shown when a copy fails.
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy text";

/// File name a downloaded page is saved under.
pub fn download_file_name(page_number: usize) -> String {
    format!("page_{page_number}.png")
}

/// Coordinates upload → render → analyse → results.
#[derive(Clone)]
pub struct PageGallery {
    state: Arc<Mutex<GalleryState>>,
    rasterizer: Arc<dyn Rasterizer>,
    analyzer: Arc<dyn Analyzer>,
    clipboard: Arc<dyn ClipboardSink>,
    progress: ProgressCallback,
    notifications: broadcast::Sender<Notification>,
    config: Arc<GalleryConfig>,
}

impl PageGallery {
    /// Build a gallery around explicit collaborators.
    pub fn new(
        config: GalleryConfig,
        rasterizer: Arc<dyn Rasterizer>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        let (notifications, _) = broadcast::channel(16);
        Self {
            state: Arc::new(Mutex::new(GalleryState::new(config.initial_doc_type))),
            rasterizer,
            analyzer,
            clipboard: Arc::new(SystemClipboard),
            progress: Arc::new(NoopProgressCallback),
            notifications,
            config: Arc::new(config),
        }
    }

    /// pdfium for rendering, the HTTP endpoint for analysis.
    pub fn from_config(config: GalleryConfig) -> Result<Self, GalleryError> {
        let rasterizer = Arc::new(PdfiumRasterizer::from_config(&config));
        let analyzer = Arc::new(HttpAnalyzer::from_config(&config)?);
        Ok(Self::new(config, rasterizer, analyzer))
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Receive transient notifications (clipboard results).
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        self.with_state(|s| s.snapshot())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut GalleryState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    // ── Upload ───────────────────────────────────────────────────────────

    /// Rasterise `pdf` into the gallery.
    ///
    /// Returns `Ok(None)` if a conversion is already running, otherwise the
    /// number of pages rendered. On failure the banner is set, pages rendered
    /// so far are kept, and the error is returned.
    pub async fn upload(&self, pdf: Vec<u8>) -> Result<Option<usize>, GalleryError> {
        if !self.with_state(|s| s.begin_upload()) {
            debug!("Upload ignored: conversion already in progress");
            return Ok(None);
        }
        let guard = FlagGuard::new(&self.state, GalleryState::abandon_upload);
        let result = self.rasterize_all(Arc::from(pdf)).await;
        guard.disarm();
        self.finish_upload(result).map(Some)
    }

    /// Read a local path or URL, then upload it.
    ///
    /// Read failures are reported exactly like rasterisation failures.
    pub async fn upload_file(&self, input_str: &str) -> Result<Option<usize>, GalleryError> {
        if !self.with_state(|s| s.begin_upload()) {
            debug!("Upload ignored: conversion already in progress");
            return Ok(None);
        }
        let guard = FlagGuard::new(&self.state, GalleryState::abandon_upload);
        info!("Uploading {}", input_str);
        let result = match input::load_pdf(input_str, self.config.download_timeout_secs).await {
            Ok(bytes) => self.rasterize_all(Arc::from(bytes)).await,
            Err(e) => Err(e),
        };
        guard.disarm();
        self.finish_upload(result).map(Some)
    }

    fn finish_upload(&self, result: Result<usize, GalleryError>) -> Result<usize, GalleryError> {
        match result {
            Ok(total) => {
                self.with_state(|s| s.finish_upload(total));
                self.progress.on_upload_complete(total);
                info!("Conversion complete: {} pages", total);
                Ok(total)
            }
            Err(e) => {
                let banner = ErrorScope::Upload.banner(&e);
                let rendered = self.with_state(|s| {
                    s.fail_upload(banner.clone());
                    s.pages().len()
                });
                warn!("{} ({} page(s) kept)", banner, rendered);
                self.progress.on_upload_failed(rendered, &banner);
                Err(e)
            }
        }
    }

    /// Render every page in order, appending each as soon as it is ready.
    ///
    /// A single blocking task opens the document once and walks its pages;
    /// finished pages come back over a one-slot channel so the gallery sees
    /// them in page order.
    async fn rasterize_all(&self, pdf: Arc<[u8]>) -> Result<usize, GalleryError> {
        let start = Instant::now();
        let rasterizer = Arc::clone(&self.rasterizer);
        let scale = self.config.render_scale;
        let (tx, mut rx) = mpsc::channel::<Rendered>(1);

        let task = tokio::task::spawn_blocking(move || {
            rasterizer.render_all(&pdf, scale, &mut |event| {
                let message = match event {
                    RenderEvent::PageCount(total) => Rendered::Count(total),
                    RenderEvent::Page { index, image } => {
                        Rendered::Page(index, encode_rendered(index, &image)?)
                    }
                };
                tx.blocking_send(message)
                    .map_err(|_| GalleryError::Internal("Upload abandoned".into()))
            })
        });

        let mut total = 0;
        while let Some(message) = rx.recv().await {
            match message {
                Rendered::Count(n) => {
                    total = n;
                    self.progress.on_upload_start(n);
                }
                Rendered::Page(index, page) => {
                    self.with_state(|s| s.push_page(page));
                    self.progress.on_page_rendered(index + 1, total);
                }
            }
        }

        let total = task
            .await
            .map_err(|e| GalleryError::Internal(format!("Render task panicked: {e}")))??;
        debug!("Rendered {} pages in {:?}", total, start.elapsed());
        Ok(total)
    }

    // ── Pages ────────────────────────────────────────────────────────────

    /// Remove page `index` and every result for its page number.
    pub fn delete_page(&self, index: usize) -> Result<(), GalleryError> {
        self.with_state(|s| s.delete_page(index)).map(|_| ())
    }

    /// Save page `index` as `page_{n}.png` in the download directory.
    pub async fn download_page(&self, index: usize) -> Result<PathBuf, GalleryError> {
        let result = self.write_page(index).await;
        if let Err(ref e) = result {
            let banner = ErrorScope::Download.banner(e);
            warn!("{}", banner);
            self.with_state(|s| s.set_error(banner));
        }
        result
    }

    async fn write_page(&self, index: usize) -> Result<PathBuf, GalleryError> {
        let data_url = self.with_state(|s| {
            s.page(index)
                .map(|p| p.data_url.clone())
                .ok_or(GalleryError::PageOutOfRange {
                    page: index + 1,
                    total: s.pages().len(),
                })
        })?;
        let decoded = encode::decode_data_url(&data_url)?;
        let path = self.config.download_dir.join(download_file_name(index + 1));
        write_atomic(&path, &decoded.bytes).await?;
        info!("Saved page {} → {}", index + 1, path.display());
        Ok(path)
    }

    // ── Analysis ─────────────────────────────────────────────────────────

    /// Analyse page `page_index` as `doc_type`.
    ///
    /// Returns `Ok(None)` without dispatching if another analysis is in
    /// flight. On success the new result is returned; on failure the banner is
    /// set and nothing is appended.
    pub async fn analyze(
        &self,
        page_index: usize,
        doc_type: DocType,
    ) -> Result<Option<AnalysisResult>, GalleryError> {
        let Some(image_data) = self.with_state(|s| s.begin_analysis(page_index))? else {
            debug!("Analysis of page {} ignored: another is in flight", page_index + 1);
            return Ok(None);
        };
        let guard = FlagGuard::new(&self.state, GalleryState::abandon_analysis);

        let page_num = page_index + 1;
        info!("Analysing page {} as {}", page_num, doc_type);
        self.progress.on_analysis_start(page_num, doc_type);

        let outcome = self.analyzer.analyze(&image_data, doc_type).await;
        guard.disarm();

        match outcome {
            Ok(content) => {
                let len = content.len();
                let result = self.with_state(|s| s.complete_analysis(page_index, doc_type, content));
                self.progress.on_analysis_complete(page_num, Ok(len));
                Ok(Some(result))
            }
            Err(e) => {
                let banner = ErrorScope::Analysis.banner(&e);
                warn!("{}", banner);
                self.with_state(|s| s.fail_analysis(banner.clone()));
                self.progress.on_analysis_complete(page_num, Err(banner.as_str()));
                Err(e)
            }
        }
    }

    /// A click on a doc type in page `page_index`'s menu: make it the global
    /// selection, close the menu, and analyse with it.
    pub async fn choose_prompt(
        &self,
        page_index: usize,
        doc_type: DocType,
    ) -> Result<Option<AnalysisResult>, GalleryError> {
        self.with_state(|s| {
            s.select_doc_type(doc_type);
            s.close_prompt_menu();
        });
        self.analyze(page_index, doc_type).await
    }

    /// Analyse with the currently selected doc type.
    pub async fn analyze_selected(
        &self,
        page_index: usize,
    ) -> Result<Option<AnalysisResult>, GalleryError> {
        let doc_type = self.with_state(|s| s.selected_doc_type());
        self.analyze(page_index, doc_type).await
    }

    pub fn select_doc_type(&self, doc_type: DocType) {
        self.with_state(|s| s.select_doc_type(doc_type));
    }

    /// Returns the page whose menu is now open, if any.
    pub fn toggle_prompt_menu(&self, page_index: usize) -> Option<usize> {
        self.with_state(|s| s.toggle_prompt_menu(page_index))
    }

    /// Remove the result with identity `index`. Returns whether one was removed.
    pub fn delete_analysis(&self, index: u64) -> bool {
        self.with_state(|s| s.delete_analysis(index))
    }

    /// Copy `content` to the clipboard and announce the outcome as a
    /// transient notification. The banner is never touched.
    pub fn copy_analysis(&self, content: &str) -> Result<(), GalleryError> {
        let duration = Duration::from_millis(self.config.notification_ms);
        match self.clipboard.set_text(content) {
            Ok(()) => {
                self.notify(Notification {
                    level: NotificationLevel::Success,
                    message: COPY_SUCCESS_MESSAGE.to_string(),
                    duration,
                });
                Ok(())
            }
            Err(reason) => {
                warn!("Clipboard copy failed: {}", reason);
                self.notify(Notification {
                    level: NotificationLevel::Error,
                    message: COPY_FAILURE_MESSAGE.to_string(),
                    duration,
                });
                Err(GalleryError::ClipboardFailed(reason))
            }
        }
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine: nobody is showing toasts.
        let _ = self.notifications.send(notification);
    }

    // ── Reading view ─────────────────────────────────────────────────────

    pub fn open_reading_view(&self, index: usize) -> Result<(), GalleryError> {
        self.with_state(|s| s.open_reading_view(index))
    }

    pub fn close_reading_view(&self) {
        self.with_state(|s| s.close_reading_view());
    }

    /// Returns whether the view moved.
    pub fn navigate_reading_view(&self, direction: Direction) -> bool {
        self.with_state(|s| s.navigate_reading_view(direction))
    }
}

/// What the render task hands back to the controller.
enum Rendered {
    Count(usize),
    Page(usize, PageImage),
}

fn encode_rendered(index: usize, image: &DynamicImage) -> Result<PageImage, GalleryError> {
    let data_url = encode::encode_page(image).map_err(|e| GalleryError::EncodingFailed {
        page: index + 1,
        detail: e.to_string(),
    })?;
    Ok(PageImage {
        data_url,
        width: image.width(),
        height: image.height(),
    })
}

/// Write to a sibling temp file, then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), GalleryError> {
    let write_err = |source| GalleryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let tmp_path = path.with_extension("png.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

/// Clears a busy flag if the owning future is dropped before finishing.
struct FlagGuard<'a> {
    state: &'a Mutex<GalleryState>,
    reset: fn(&mut GalleryState),
    armed: bool,
}

impl<'a> FlagGuard<'a> {
    fn new(state: &'a Mutex<GalleryState>, reset: fn(&mut GalleryState)) -> Self {
        Self {
            state,
            reset,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            (self.reset)(&mut guard);
        }
    }
}
