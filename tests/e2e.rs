//! End-to-end tests against a real pdfium library.
//!
//! Gated behind `E2E_ENABLED` since they need libpdfium on the machine
//! (system-wide or via `PDFIUM_LIB_PATH`).
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/opt/pdfium/lib cargo test --test e2e -- --nocapture

use pdf_gallery::{
    server, DocType, GalleryConfig, GalleryError, HttpAnalyzer, PageGallery, PdfiumRasterizer,
    Rasterizer, RenderEvent, ServerConfig,
};
use std::sync::Arc;

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// Build a minimal PDF with `pages` blank US-letter pages and a valid xref.
fn blank_pdf(pages: usize) -> Vec<u8> {
    let mut objects = Vec::new();
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 3 + i)).collect();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string());
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for off in offsets {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    out
}

#[test]
fn test_page_count() {
    e2e_skip_unless_enabled!();
    let r = PdfiumRasterizer::new();
    assert_eq!(r.page_count(&blank_pdf(4)).unwrap(), 4);
}

#[test]
fn test_render_scale() {
    e2e_skip_unless_enabled!();
    let r = PdfiumRasterizer::new();
    let img = r.render_page(&blank_pdf(1), 0, 2.0).unwrap();
    assert_eq!((img.width(), img.height()), (1224, 1584));
}

#[test]
fn test_render_all_in_one_pass() {
    e2e_skip_unless_enabled!();
    let r = PdfiumRasterizer::new();
    let mut pages = Vec::new();
    let total = r
        .render_all(&blank_pdf(3), 1.0, &mut |event| {
            if let RenderEvent::Page { index, image } = event {
                pages.push((index, image.width()));
            }
            Ok(())
        })
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(pages, vec![(0, 612), (1, 612), (2, 612)]);
}

#[test]
fn test_corrupt_pdf() {
    e2e_skip_unless_enabled!();
    let r = PdfiumRasterizer::new();
    let err = r.page_count(b"%PDF-1.4\nthis is not a pdf").unwrap_err();
    assert!(matches!(err, GalleryError::CorruptPdf { .. }), "{err}");
}

#[tokio::test]
async fn test_upload_and_analyze() {
    e2e_skip_unless_enabled!();
    let (addr, _server) = server::spawn(&ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        analysis_delay_ms: 0,
    })
    .await
    .unwrap();

    let config = GalleryConfig::builder()
        .endpoint_url(format!("http://{addr}/api/analyze"))
        .build()
        .unwrap();
    let analyzer = Arc::new(HttpAnalyzer::from_config(&config).unwrap());
    let rasterizer = Arc::new(PdfiumRasterizer::from_config(&config));
    let gallery = PageGallery::new(config, rasterizer, analyzer);

    assert_eq!(gallery.upload(blank_pdf(3)).await.unwrap(), Some(3));
    let snap = gallery.snapshot();
    assert_eq!(snap.page_count(), 3);
    assert!(snap.pages.iter().all(|p| p.width == 1224));

    let result = gallery
        .analyze(2, DocType::Invoice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.page_number, 3);
    assert_eq!(result.content, server::analysis_for(DocType::Invoice));
}
