//! Integration tests for the gallery controller.
//!
//! pdfium is replaced by an in-memory rasteriser so these run anywhere; the
//! analysis side uses either scripted analysers or the real mock endpoint on
//! a loopback port.

use futures::future::BoxFuture;
use image::DynamicImage;
use pdf_gallery::pipeline::encode::decode_data_url;
use pdf_gallery::{
    server, Analyzer, ClipboardSink, Direction, DocType, GalleryConfig, GalleryError,
    GalleryProgressCallback, HttpAnalyzer, MemoryClipboard, NotificationLevel, PageGallery,
    Rasterizer, RenderEvent, ServerConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Pretends every `%PDF` buffer has `pages` pages.
struct FakeRasterizer {
    pages: usize,
    fail_at: Option<usize>,
}

impl FakeRasterizer {
    fn new(pages: usize) -> Self {
        Self {
            pages,
            fail_at: None,
        }
    }

    fn failing_at(pages: usize, index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(pages)
        }
    }
}

impl Rasterizer for FakeRasterizer {
    fn page_count(&self, pdf: &[u8]) -> Result<usize, GalleryError> {
        if !pdf.starts_with(b"%PDF") {
            return Err(GalleryError::CorruptPdf {
                detail: "missing header".into(),
            });
        }
        Ok(self.pages)
    }

    fn render_page(
        &self,
        _pdf: &[u8],
        index: usize,
        scale: f32,
    ) -> Result<DynamicImage, GalleryError> {
        if self.fail_at == Some(index) {
            return Err(GalleryError::RasterisationFailed {
                page: index + 1,
                detail: "bad content stream".into(),
            });
        }
        // Width encodes the page so ordering is observable.
        let width = (10 + index as u32) * scale as u32;
        Ok(DynamicImage::new_rgb8(width, 8))
    }
}

/// Counts how often the document is opened; per-page rendering is refused.
#[derive(Default)]
struct SingleOpenRasterizer {
    opens: AtomicUsize,
}

impl Rasterizer for SingleOpenRasterizer {
    fn page_count(&self, _pdf: &[u8]) -> Result<usize, GalleryError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(4)
    }

    fn render_page(
        &self,
        _pdf: &[u8],
        index: usize,
        _scale: f32,
    ) -> Result<DynamicImage, GalleryError> {
        Err(GalleryError::RasterisationFailed {
            page: index + 1,
            detail: "document reopened per page".into(),
        })
    }

    fn render_all(
        &self,
        _pdf: &[u8],
        _scale: f32,
        on_event: &mut dyn FnMut(RenderEvent) -> Result<(), GalleryError>,
    ) -> Result<usize, GalleryError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        on_event(RenderEvent::PageCount(4))?;
        for index in 0..4 {
            let image = DynamicImage::new_rgb8(index as u32 + 1, 1);
            on_event(RenderEvent::Page { index, image })?;
        }
        Ok(4)
    }
}

/// Answers `"{docType} of {bytes} bytes"` once a permit is available.
struct GatedAnalyzer {
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedAnalyzer {
    fn open() -> Self {
        Self {
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            calls: AtomicUsize::new(0),
        }
    }

    fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Analyzer for GatedAnalyzer {
    fn analyze<'a>(
        &'a self,
        image_data: &'a str,
        doc_type: DocType,
    ) -> BoxFuture<'a, Result<String, GalleryError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| GalleryError::Internal(e.to_string()))?;
            Ok(format!("{} of {} bytes", doc_type.tag(), image_data.len()))
        })
    }
}

struct RejectingAnalyzer;

impl Analyzer for RejectingAnalyzer {
    fn analyze<'a>(
        &'a self,
        _image_data: &'a str,
        _doc_type: DocType,
    ) -> BoxFuture<'a, Result<String, GalleryError>> {
        Box::pin(async {
            Err(GalleryError::AnalysisRejected {
                status: 500,
                detail: "Failed to process the image".into(),
            })
        })
    }
}

struct BrokenClipboard;

impl ClipboardSink for BrokenClipboard {
    fn set_text(&self, _text: &str) -> Result<(), String> {
        Err("no display".into())
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl GalleryProgressCallback for RecordingProgress {
    fn on_upload_start(&self, total_pages: usize) {
        self.events.lock().unwrap().push(format!("start {total_pages}"));
    }

    fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("page {page_num}/{total_pages}"));
    }

    fn on_upload_complete(&self, total_pages: usize) {
        self.events.lock().unwrap().push(format!("done {total_pages}"));
    }

    fn on_upload_failed(&self, rendered: usize, _error: &str) {
        self.events.lock().unwrap().push(format!("failed {rendered}"));
    }
}

const PDF: &[u8] = b"%PDF-1.7 fake";

fn gallery(rasterizer: FakeRasterizer, analyzer: Arc<dyn Analyzer>) -> PageGallery {
    PageGallery::new(GalleryConfig::default(), Arc::new(rasterizer), analyzer)
        .with_clipboard(Arc::new(MemoryClipboard::new()))
}

async fn loaded(pages: usize, analyzer: Arc<dyn Analyzer>) -> PageGallery {
    let g = gallery(FakeRasterizer::new(pages), analyzer);
    assert_eq!(g.upload(PDF.to_vec()).await.unwrap(), Some(pages));
    g
}

/// Spin until the in-flight analysis has been claimed.
async fn wait_for_analyzing(g: &PageGallery) {
    for _ in 0..1000 {
        if g.snapshot().analyzing.is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("analysis never started");
}

// ── Upload ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_appends_pages_in_order() {
    let progress = Arc::new(RecordingProgress::default());
    let g = gallery(FakeRasterizer::new(3), Arc::new(GatedAnalyzer::open()))
        .with_progress(progress.clone());

    assert_eq!(g.upload(PDF.to_vec()).await.unwrap(), Some(3));

    let snap = g.snapshot();
    assert_eq!(snap.page_count(), 3);
    assert!(!snap.converting);
    assert!(snap.error.is_none());
    // Default scale is 2.0.
    let widths: Vec<u32> = snap.pages.iter().map(|p| p.width).collect();
    assert_eq!(widths, vec![20, 22, 24]);
    assert!(snap.pages.iter().all(|p| p.data_url.starts_with("data:image/png;base64,")));
    assert_eq!(
        snap.completion_message().as_deref(),
        Some("Conversion complete! 3 pages converted. Click on any page to read or analyze its content.")
    );
    assert_eq!(
        *progress.events.lock().unwrap(),
        vec!["start 3", "page 1/3", "page 2/3", "page 3/3", "done 3"]
    );
}

#[tokio::test]
async fn upload_opens_the_document_once() {
    let rasterizer = Arc::new(SingleOpenRasterizer::default());
    let g = PageGallery::new(
        GalleryConfig::default(),
        rasterizer.clone(),
        Arc::new(GatedAnalyzer::open()),
    );

    assert_eq!(g.upload(PDF.to_vec()).await.unwrap(), Some(4));
    assert_eq!(rasterizer.opens.load(Ordering::SeqCst), 1);

    let widths: Vec<u32> = g.snapshot().pages.iter().map(|p| p.width).collect();
    assert_eq!(widths, vec![1, 2, 3, 4]);
    assert!(g.snapshot().error.is_none());
}

#[tokio::test]
async fn failure_mid_document_keeps_earlier_pages() {
    let progress = Arc::new(RecordingProgress::default());
    let g = gallery(
        FakeRasterizer::failing_at(5, 2),
        Arc::new(GatedAnalyzer::open()),
    )
    .with_progress(progress.clone());

    let err = g.upload(PDF.to_vec()).await.unwrap_err();
    assert!(matches!(err, GalleryError::RasterisationFailed { page: 3, .. }));

    let snap = g.snapshot();
    assert_eq!(snap.page_count(), 2);
    assert!(!snap.converting);
    assert!(snap.completion_message().is_none());
    let banner = snap.error.unwrap();
    assert!(banner.starts_with("Error converting PDF to images: "), "{banner}");
    assert_eq!(progress.events.lock().unwrap().last().unwrap(), "failed 2");
}

#[tokio::test]
async fn malformed_upload_adds_nothing() {
    let g = gallery(FakeRasterizer::new(4), Arc::new(GatedAnalyzer::open()));
    let err = g.upload(b"hello".to_vec()).await.unwrap_err();
    assert!(matches!(err, GalleryError::CorruptPdf { .. }));

    let snap = g.snapshot();
    assert_eq!(snap.page_count(), 0);
    assert!(!snap.converting);
    assert!(snap.error.unwrap().starts_with("Error converting PDF to images: "));
}

#[tokio::test]
async fn missing_file_is_an_upload_error() {
    let g = gallery(FakeRasterizer::new(1), Arc::new(GatedAnalyzer::open()));
    let err = g
        .upload_file("/definitely/not/here.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, GalleryError::FileNotFound { .. }));
    assert!(!g.snapshot().converting);
    assert!(g.snapshot().error.is_some());
}

#[tokio::test]
async fn upload_file_reads_local_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, PDF).unwrap();

    let g = gallery(FakeRasterizer::new(2), Arc::new(GatedAnalyzer::open()));
    let n = g.upload_file(path.to_str().unwrap()).await.unwrap();
    assert_eq!(n, Some(2));
}

#[tokio::test]
async fn reupload_replaces_pages_but_keeps_results() {
    let g = loaded(2, Arc::new(GatedAnalyzer::open())).await;
    g.analyze(1, DocType::Summary).await.unwrap();

    let g2 = g.clone();
    assert_eq!(g2.upload(PDF.to_vec()).await.unwrap(), Some(2));
    let snap = g.snapshot();
    assert_eq!(snap.page_count(), 2);
    assert_eq!(snap.results.len(), 1);
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_page_removes_its_results_only() {
    let g = loaded(3, Arc::new(GatedAnalyzer::open())).await;
    g.analyze(0, DocType::RawText).await.unwrap();
    g.analyze(1, DocType::Invoice).await.unwrap();
    g.analyze(2, DocType::Contract).await.unwrap();
    g.analyze(1, DocType::Summary).await.unwrap();

    g.delete_page(1).unwrap();

    let snap = g.snapshot();
    assert_eq!(snap.page_count(), 2);
    let numbers: Vec<usize> = snap.results.iter().map(|r| r.page_number).collect();
    // Page 3's result is not renumbered.
    assert_eq!(numbers, vec![1, 3]);
}

#[tokio::test]
async fn delete_page_out_of_range() {
    let g = loaded(1, Arc::new(GatedAnalyzer::open())).await;
    assert!(matches!(
        g.delete_page(5),
        Err(GalleryError::PageOutOfRange { page: 6, total: 1 })
    ));
    assert_eq!(g.snapshot().page_count(), 1);
}

// ── Analysis ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn only_one_analysis_in_flight() {
    let analyzer = Arc::new(GatedAnalyzer::closed());
    let g = loaded(2, analyzer.clone()).await;

    let first = {
        let g = g.clone();
        tokio::spawn(async move { g.analyze(0, DocType::Invoice).await })
    };
    wait_for_analyzing(&g).await;

    let snap = g.snapshot();
    assert!(!snap.analyze_enabled());
    assert_eq!(snap.analyze_button_label(0), "Analyzing...");
    assert_eq!(snap.analyze_button_label(1), "Analyze as: Extract Raw Text");

    // Second trigger is ignored without dispatching.
    assert_eq!(g.analyze(1, DocType::Summary).await.unwrap(), None);
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);

    analyzer.gate.add_permits(1);
    let result = first.await.unwrap().unwrap().unwrap();
    assert_eq!(result.page_number, 1);
    assert_eq!(result.doc_type, DocType::Invoice);
    assert!(result.content.starts_with("invoice of "));
    assert!(g.snapshot().analyze_enabled());
    assert_eq!(g.snapshot().results.len(), 1);
}

#[tokio::test]
async fn result_indices_increase() {
    let g = loaded(1, Arc::new(GatedAnalyzer::open())).await;
    let a = g.analyze(0, DocType::RawText).await.unwrap().unwrap();
    let b = g.analyze(0, DocType::RawText).await.unwrap().unwrap();
    assert!(g.delete_analysis(b.index));
    let c = g.analyze(0, DocType::RawText).await.unwrap().unwrap();
    assert!(b.index > a.index);
    assert!(c.index > b.index);
    assert_eq!(a.badge(), "#1");
    assert_eq!(a.heading(), "Analysis Result - Page 1");
}

#[tokio::test]
async fn rejected_analysis_sets_banner_and_appends_nothing() {
    let g = loaded(1, Arc::new(RejectingAnalyzer)).await;
    let err = g.analyze(0, DocType::Invoice).await.unwrap_err();
    assert!(matches!(err, GalleryError::AnalysisRejected { status: 500, .. }));

    let snap = g.snapshot();
    assert!(snap.results.is_empty());
    assert!(snap.analyzing.is_none());
    assert!(snap.error.unwrap().starts_with("Error analyzing image: "));
}

#[tokio::test]
async fn dropped_analysis_releases_the_slot() {
    let analyzer = Arc::new(GatedAnalyzer::closed());
    let g = loaded(1, analyzer.clone()).await;

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), g.analyze(0, DocType::Research)).await;
    assert!(timed_out.is_err());
    assert!(g.snapshot().analyzing.is_none());
    assert!(g.snapshot().results.is_empty());
}

#[tokio::test]
async fn choose_prompt_selects_closes_menu_and_analyzes() {
    let g = loaded(2, Arc::new(GatedAnalyzer::open())).await;
    assert_eq!(g.toggle_prompt_menu(1), Some(1));

    let result = g.choose_prompt(1, DocType::Certificate).await.unwrap().unwrap();
    assert_eq!(result.page_number, 2);
    assert_eq!(result.doc_type, DocType::Certificate);

    let snap = g.snapshot();
    assert_eq!(snap.prompt_menu, None);
    assert_eq!(snap.selected_doc_type, DocType::Certificate);

    let again = g.analyze_selected(0).await.unwrap().unwrap();
    assert_eq!(again.doc_type, DocType::Certificate);
}

#[tokio::test]
async fn invoice_analysis_against_mock_endpoint() {
    let (addr, _server) = server::spawn(&ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        analysis_delay_ms: 0,
    })
    .await
    .unwrap();
    let analyzer = HttpAnalyzer::new(format!("http://{addr}/api/analyze"), None).unwrap();
    let g = loaded(2, Arc::new(analyzer)).await;

    let result = g.analyze(1, DocType::Invoice).await.unwrap().unwrap();
    assert_eq!(result.page_number, 2);
    assert_eq!(result.content, server::analysis_for(DocType::Invoice));
    assert!(result.content.contains("**Total Due**: $9,570"));
}

// ── Download ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn download_writes_png_named_by_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = GalleryConfig::builder()
        .download_dir(dir.path())
        .build()
        .unwrap();
    let g = PageGallery::new(
        config,
        Arc::new(FakeRasterizer::new(2)),
        Arc::new(GatedAnalyzer::open()),
    );
    g.upload(PDF.to_vec()).await.unwrap();

    let path = g.download_page(1).await.unwrap();
    assert_eq!(path, dir.path().join("page_2.png"));
    let bytes = std::fs::read(&path).unwrap();
    let expected = decode_data_url(&g.snapshot().pages[1].data_url).unwrap();
    assert_eq!(bytes, expected.bytes);
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn download_out_of_range_sets_banner() {
    let g = loaded(1, Arc::new(GatedAnalyzer::open())).await;
    assert!(g.download_page(3).await.is_err());
    assert!(g
        .snapshot()
        .error
        .unwrap()
        .starts_with("Error downloading image: "));
}

// ── Reading view ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reading_view_navigation() {
    let g = loaded(3, Arc::new(GatedAnalyzer::open())).await;
    g.open_reading_view(0).unwrap();

    let snap = g.snapshot();
    assert_eq!(snap.reading_view_title().as_deref(), Some("Page 1 of 3"));
    assert!(!snap.can_go_prev());
    assert!(snap.can_go_next());

    assert!(!g.navigate_reading_view(Direction::Prev));
    assert!(g.navigate_reading_view(Direction::Next));
    assert!(g.navigate_reading_view(Direction::Next));
    assert!(!g.navigate_reading_view(Direction::Next));

    let snap = g.snapshot();
    let view = snap.reading_view.as_ref().unwrap();
    assert_eq!(view.page_number, 3);
    assert_eq!(view.image_url, snap.pages[2].data_url);

    g.delete_page(2).unwrap();
    assert!(g.snapshot().reading_view.is_none());

    g.open_reading_view(1).unwrap();
    g.close_reading_view();
    assert!(g.snapshot().reading_view.is_none());
}

// ── Clipboard ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn copy_success_notifies_and_leaves_banner_alone() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let g = PageGallery::new(
        GalleryConfig::default(),
        Arc::new(FakeRasterizer::new(1)),
        Arc::new(GatedAnalyzer::open()),
    )
    .with_clipboard(clipboard.clone());
    let mut notes = g.subscribe();

    g.copy_analysis("## Summary").unwrap();

    assert_eq!(clipboard.last_copied().as_deref(), Some("## Summary"));
    let note = notes.recv().await.unwrap();
    assert_eq!(note.level, NotificationLevel::Success);
    assert_eq!(note.message, "Analysis copied to clipboard!");
    assert_eq!(note.duration, Duration::from_millis(2000));
    assert!(g.snapshot().error.is_none());
}

#[tokio::test]
async fn copy_failure_notifies_without_banner() {
    let g = PageGallery::new(
        GalleryConfig::default(),
        Arc::new(FakeRasterizer::new(1)),
        Arc::new(GatedAnalyzer::open()),
    )
    .with_clipboard(Arc::new(BrokenClipboard));
    let mut notes = g.subscribe();

    assert!(matches!(
        g.copy_analysis("text"),
        Err(GalleryError::ClipboardFailed(_))
    ));
    let note = notes.recv().await.unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, "Failed to copy text");
    assert!(g.snapshot().error.is_none());
}
