//! Progress-callback trait for upload and analysis events.
//!
//! Inject an [`Arc<dyn GalleryProgressCallback>`] via
//! [`crate::gallery::PageGallery::with_progress`] to receive events as the
//! controller renders pages and runs analyses. The CLI uses it to drive a
//! progress bar; a GUI would use it to repaint.
//!
//! # Example
//!
//! ```rust
//! use pdf_gallery::GalleryProgressCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl GalleryProgressCallback for CountingCallback {
//!     fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} rendered", page_num, total_pages);
//!     }
//! }
//! ```

use crate::doc_type::DocType;
use std::sync::Arc;

/// Called by the gallery controller as work progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; analysis
/// events may arrive on a different task than upload events.
pub trait GalleryProgressCallback: Send + Sync {
    /// Called once the page count is known, before the first page renders.
    fn on_upload_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page has been rendered and appended.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when every page has been rendered.
    fn on_upload_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when an upload aborts.
    ///
    /// # Arguments
    /// * `rendered` — pages appended before the failure (they are kept)
    /// * `error`    — human-readable error description
    fn on_upload_failed(&self, rendered: usize, error: &str) {
        let _ = (rendered, error);
    }

    /// Called just before an analysis request is dispatched.
    fn on_analysis_start(&self, page_num: usize, doc_type: DocType) {
        let _ = (page_num, doc_type);
    }

    /// Called when an analysis request resolves.
    ///
    /// `result` is the markdown length on success, or the error text.
    fn on_analysis_complete(&self, page_num: usize, result: Result<usize, &str>) {
        let _ = (page_num, result);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl GalleryProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback type.
pub type ProgressCallback = Arc<dyn GalleryProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        rendered: AtomicUsize,
        failures: AtomicUsize,
        analyses: AtomicUsize,
    }

    impl GalleryProgressCallback for TrackingCallback {
        fn on_upload_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_rendered(&self, _page_num: usize, _total_pages: usize) {
            self.rendered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_upload_failed(&self, _rendered: usize, _error: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }

        fn on_analysis_complete(&self, _page_num: usize, result: Result<usize, &str>) {
            if result.is_ok() {
                self.analyses.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_upload_start(5);
        cb.on_page_rendered(1, 5);
        cb.on_upload_failed(1, "corrupt");
        cb.on_upload_complete(5);
        cb.on_analysis_start(1, DocType::Invoice);
        cb.on_analysis_complete(1, Err("timeout"));
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_upload_start(3);
        tracker.on_page_rendered(1, 3);
        tracker.on_page_rendered(2, 3);
        tracker.on_upload_failed(2, "page 3 broken");
        tracker.on_analysis_complete(1, Ok(120));
        tracker.on_analysis_complete(2, Err("HTTP 500"));

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.rendered.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.analyses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_upload_start(10);
        cb.on_page_rendered(1, 10);
    }
}
