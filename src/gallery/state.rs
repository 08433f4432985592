//! Pure gallery state and its synchronous transitions.
//!
//! Nothing here performs I/O or awaits. [`crate::gallery::PageGallery`] calls
//! these transitions inside short critical sections, before and after the
//! asynchronous work (rendering, analysis) it drives.

use crate::doc_type::DocType;
use crate::error::GalleryError;
use crate::model::{AnalysisResult, Direction, GallerySnapshot, PageImage, ReadingView};
use tracing::debug;

/// Everything the gallery knows.
#[derive(Debug, Clone)]
pub struct GalleryState {
    pages: Vec<PageImage>,
    results: Vec<AnalysisResult>,
    converting: bool,
    analyzing: Option<usize>,
    error: Option<String>,
    converted_pages: Option<usize>,
    reading_view: Option<ReadingView>,
    selected_doc_type: DocType,
    prompt_menu: Option<usize>,
    next_index: u64,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new(DocType::default())
    }
}

impl GalleryState {
    pub fn new(selected_doc_type: DocType) -> Self {
        Self {
            pages: Vec::new(),
            results: Vec::new(),
            converting: false,
            analyzing: None,
            error: None,
            converted_pages: None,
            reading_view: None,
            selected_doc_type,
            prompt_menu: None,
            next_index: 0,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn pages(&self) -> &[PageImage] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageImage> {
        self.pages.get(index)
    }

    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    pub fn is_converting(&self) -> bool {
        self.converting
    }

    pub fn analyzing(&self) -> Option<usize> {
        self.analyzing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reading_view(&self) -> Option<&ReadingView> {
        self.reading_view.as_ref()
    }

    pub fn selected_doc_type(&self) -> DocType {
        self.selected_doc_type
    }

    pub fn prompt_menu(&self) -> Option<usize> {
        self.prompt_menu
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            pages: self.pages.clone(),
            results: self.results.clone(),
            converting: self.converting,
            analyzing: self.analyzing,
            error: self.error.clone(),
            converted_pages: self.converted_pages,
            reading_view: self.reading_view.clone(),
            selected_doc_type: self.selected_doc_type,
            prompt_menu: self.prompt_menu,
        }
    }

    fn check_page(&self, index: usize) -> Result<(), GalleryError> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(GalleryError::PageOutOfRange {
                page: index + 1,
                total: self.pages.len(),
            })
        }
    }

    // ── Upload ───────────────────────────────────────────────────────────

    /// Start a conversion. Returns `false` (and changes nothing) if one is
    /// already running.
    ///
    /// Clears pages, the banner and the reading view. Analysis results are
    /// kept.
    pub fn begin_upload(&mut self) -> bool {
        if self.converting {
            return false;
        }
        self.converting = true;
        self.error = None;
        self.converted_pages = None;
        self.pages.clear();
        self.reading_view = None;
        self.prompt_menu = None;
        true
    }

    pub fn push_page(&mut self, page: PageImage) {
        self.pages.push(page);
    }

    pub fn finish_upload(&mut self, total_pages: usize) {
        self.converting = false;
        self.converted_pages = Some(total_pages);
    }

    /// Abort the conversion. Pages already appended stay.
    pub fn fail_upload(&mut self, banner: String) {
        self.converting = false;
        self.error = Some(banner);
    }

    /// Clear the converting flag without touching anything else.
    pub(crate) fn abandon_upload(&mut self) {
        self.converting = false;
    }

    // ── Pages ────────────────────────────────────────────────────────────

    /// Remove page `index`, the results for its page number, and the reading
    /// view if it showed that page.
    ///
    /// Other results keep their `page_number` even though later pages shift
    /// down one position.
    pub fn delete_page(&mut self, index: usize) -> Result<PageImage, GalleryError> {
        self.check_page(index)?;
        let page_number = index + 1;
        let removed = self.pages.remove(index);

        let before = self.results.len();
        self.results.retain(|r| r.page_number != page_number);
        debug!(
            "Deleted page {} and {} analysis result(s)",
            page_number,
            before - self.results.len()
        );

        if self
            .reading_view
            .as_ref()
            .is_some_and(|v| v.page_number == page_number)
        {
            self.reading_view = None;
        }
        if self.prompt_menu == Some(index) {
            self.prompt_menu = None;
        }
        Ok(removed)
    }

    // ── Analysis ─────────────────────────────────────────────────────────

    /// Claim the single analysis slot for `page_index`.
    ///
    /// Returns `Ok(None)` when another analysis is in flight; otherwise the
    /// page's data URL to send.
    pub fn begin_analysis(&mut self, page_index: usize) -> Result<Option<String>, GalleryError> {
        if self.analyzing.is_some() {
            return Ok(None);
        }
        self.check_page(page_index)?;
        self.analyzing = Some(page_index);
        Ok(Some(self.pages[page_index].data_url.clone()))
    }

    /// Release the slot and append a result with a fresh index.
    pub fn complete_analysis(
        &mut self,
        page_index: usize,
        doc_type: DocType,
        content: String,
    ) -> AnalysisResult {
        self.analyzing = None;
        let result = AnalysisResult {
            page_number: page_index + 1,
            content,
            index: self.next_index,
            doc_type,
        };
        self.next_index += 1;
        self.results.push(result.clone());
        result
    }

    /// Release the slot and show `banner`. Nothing is appended.
    pub fn fail_analysis(&mut self, banner: String) {
        self.analyzing = None;
        self.error = Some(banner);
    }

    pub(crate) fn abandon_analysis(&mut self) {
        self.analyzing = None;
    }

    /// Remove the result whose identity is `index`.
    pub fn delete_analysis(&mut self, index: u64) -> bool {
        let before = self.results.len();
        self.results.retain(|r| r.index != index);
        self.results.len() != before
    }

    // ── Prompt menu ──────────────────────────────────────────────────────

    pub fn select_doc_type(&mut self, doc_type: DocType) {
        self.selected_doc_type = doc_type;
    }

    /// Open the menu on `page_index`, or close it if it is already open there.
    /// The menu cannot be opened while an analysis is running.
    pub fn toggle_prompt_menu(&mut self, page_index: usize) -> Option<usize> {
        if self.analyzing.is_some() {
            return self.prompt_menu;
        }
        self.prompt_menu = if self.prompt_menu == Some(page_index) {
            None
        } else {
            Some(page_index)
        };
        self.prompt_menu
    }

    pub fn close_prompt_menu(&mut self) {
        self.prompt_menu = None;
    }

    // ── Reading view ─────────────────────────────────────────────────────

    pub fn open_reading_view(&mut self, index: usize) -> Result<(), GalleryError> {
        self.check_page(index)?;
        self.reading_view = Some(ReadingView {
            image_url: self.pages[index].data_url.clone(),
            page_number: index + 1,
        });
        Ok(())
    }

    pub fn close_reading_view(&mut self) {
        self.reading_view = None;
    }

    /// Move the reading view one page. Returns whether it moved.
    ///
    /// Clamped to `[0, page_count - 1]`; a no-op at either end.
    pub fn navigate_reading_view(&mut self, direction: Direction) -> bool {
        let Some(view) = self.reading_view.as_ref() else {
            return false;
        };
        if self.pages.is_empty() {
            return false;
        }
        let current = view.page_number.saturating_sub(1);
        let last = self.pages.len() - 1;
        let target = match direction {
            Direction::Prev => current.saturating_sub(1),
            Direction::Next => (current + 1).min(last),
        };
        if target == current {
            return false;
        }
        self.reading_view = Some(ReadingView {
            image_url: self.pages[target].data_url.clone(),
            page_number: target + 1,
        });
        true
    }

    // ── Banner ───────────────────────────────────────────────────────────

    pub fn set_error(&mut self, banner: String) {
        self.error = Some(banner);
    }
}
