//! Plain data carried by the gallery: pages, results, the reading view and
//! notifications.

use crate::doc_type::DocType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One rendered page. Its 1-based page number is implied by its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    /// `data:image/png;base64,…`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// A successful analysis of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 1-based page number at the time of the request.
    pub page_number: usize,
    /// Markdown returned by the analyser.
    pub content: String,
    /// Stable identity, unique and increasing in append order.
    pub index: u64,
    pub doc_type: DocType,
}

impl AnalysisResult {
    /// Card heading, e.g. `Analysis Result - Page 3`.
    pub fn heading(&self) -> String {
        format!("Analysis Result - Page {}", self.page_number)
    }

    /// Badge shown next to the heading, e.g. `#1`.
    pub fn badge(&self) -> String {
        format!("#{}", self.index + 1)
    }
}

/// The page currently shown full-screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    pub image_url: String,
    /// 1-based.
    pub page_number: usize,
}

/// Reading-view navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A short-lived, non-blocking message (the "toast" channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub duration: Duration,
}

/// A read-only copy of the whole gallery state, for rendering or JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySnapshot {
    pub pages: Vec<PageImage>,
    pub results: Vec<AnalysisResult>,
    pub converting: bool,
    pub analyzing: Option<usize>,
    pub error: Option<String>,
    pub converted_pages: Option<usize>,
    pub reading_view: Option<ReadingView>,
    pub selected_doc_type: DocType,
    pub prompt_menu: Option<usize>,
}

impl GallerySnapshot {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Success banner shown once conversion has finished.
    pub fn completion_message(&self) -> Option<String> {
        match self.converted_pages {
            Some(n) if n > 0 && !self.converting => Some(format!(
                "Conversion complete! {n} pages converted. \
                 Click on any page to read or analyze its content."
            )),
            _ => None,
        }
    }

    /// Reading-view title, e.g. `Page 2 of 5`.
    pub fn reading_view_title(&self) -> Option<String> {
        self.reading_view
            .as_ref()
            .map(|v| format!("Page {} of {}", v.page_number, self.pages.len()))
    }

    pub fn can_go_prev(&self) -> bool {
        self.reading_view
            .as_ref()
            .is_some_and(|v| v.page_number > 1)
    }

    pub fn can_go_next(&self) -> bool {
        self.reading_view
            .as_ref()
            .is_some_and(|v| v.page_number < self.pages.len())
    }

    /// Label on a page's analyse button.
    pub fn analyze_button_label(&self, page_index: usize) -> String {
        if self.analyzing == Some(page_index) {
            "Analyzing...".to_string()
        } else {
            format!("Analyze as: {}", self.selected_doc_type.label())
        }
    }

    /// Analyse buttons are disabled while any analysis is in flight.
    pub fn analyze_enabled(&self) -> bool {
        self.analyzing.is_none()
    }
}
