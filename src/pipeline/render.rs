//! PDF rasterisation: the [`Rasterizer`] contract and its pdfium backend.
//!
//! ## Why a trait?
//!
//! The gallery only needs two things from a PDF engine: how many pages a
//! document has, and a bitmap of page `i` at a given scale. Keeping that
//! behind a trait lets the controller be exercised without a pdfium library
//! on the machine.
//!
//! ## Why blocking methods?
//!
//! pdfium uses thread-local state and is not async-safe. The controller calls
//! these methods through `tokio::task::spawn_blocking`, one page at a time.

use crate::config::GalleryConfig;
use crate::error::GalleryError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Converts PDF bytes into page bitmaps.
pub trait Rasterizer: Send + Sync {
    /// Number of pages in the document. Fails if the document cannot be parsed.
    fn page_count(&self, pdf: &[u8]) -> Result<usize, GalleryError>;

    /// Render page `index` (0-based) at `scale` × its natural size.
    fn render_page(&self, pdf: &[u8], index: usize, scale: f32)
        -> Result<DynamicImage, GalleryError>;

    /// Render every page in order, handing each to `on_event` as it is done.
    ///
    /// The page count arrives first. An error from `on_event` stops rendering
    /// and is returned. Backends that can keep a document open across pages
    /// should override this; the default reopens per page.
    fn render_all(
        &self,
        pdf: &[u8],
        scale: f32,
        on_event: &mut dyn FnMut(RenderEvent) -> Result<(), GalleryError>,
    ) -> Result<usize, GalleryError> {
        let total = self.page_count(pdf)?;
        on_event(RenderEvent::PageCount(total))?;
        for index in 0..total {
            let image = self.render_page(pdf, index, scale)?;
            on_event(RenderEvent::Page { index, image })?;
        }
        Ok(total)
    }
}

/// Progress of a whole-document render.
#[derive(Debug)]
pub enum RenderEvent {
    PageCount(usize),
    /// Page `index` (0-based) is ready.
    Page { index: usize, image: DynamicImage },
}

/// [`Rasterizer`] backed by pdfium-render.
///
/// A fresh pdfium binding is made per call; pdfium's global state makes a
/// long-lived shared handle more trouble than it is worth for a gallery that
/// renders one page at a time.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
    password: Option<String>,
    max_rendered_pixels: Option<u32>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the gallery's pdfium-related settings.
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            library_path: config.pdfium_library_path.clone(),
            password: config.password.clone(),
            max_rendered_pixels: config.max_rendered_pixels,
        }
    }

    fn bind(&self) -> Result<Pdfium, GalleryError> {
        let explicit = self
            .library_path
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

        let bindings = match explicit {
            Some(path) => {
                let path = if path.is_dir() {
                    Pdfium::pdfium_platform_library_name_at_path(&path)
                } else {
                    path
                };
                debug!("Binding pdfium from {}", path.display());
                Pdfium::bind_to_library(&path)
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| GalleryError::PdfiumBindingFailed(format!("{e:?}")))?;

        Ok(Pdfium::new(bindings))
    }

    fn load<'a>(&self, pdfium: &'a Pdfium, pdf: &'a [u8]) -> Result<PdfDocument<'a>, GalleryError> {
        let password = self.password.as_deref();
        pdfium.load_pdf_from_byte_slice(pdf, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    GalleryError::WrongPassword
                } else {
                    GalleryError::PasswordRequired
                }
            } else {
                GalleryError::CorruptPdf { detail: err_str }
            }
        })
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn page_count(&self, pdf: &[u8]) -> Result<usize, GalleryError> {
        let pdfium = self.bind()?;
        let document = self.load(&pdfium, pdf)?;
        let total = document.pages().len() as usize;
        info!("PDF loaded: {} pages", total);
        Ok(total)
    }

    fn render_page(
        &self,
        pdf: &[u8],
        index: usize,
        scale: f32,
    ) -> Result<DynamicImage, GalleryError> {
        let pdfium = self.bind()?;
        let document = self.load(&pdfium, pdf)?;
        self.render_loaded(&document, index, scale)
    }

    /// One bind and one parse for the whole document.
    fn render_all(
        &self,
        pdf: &[u8],
        scale: f32,
        on_event: &mut dyn FnMut(RenderEvent) -> Result<(), GalleryError>,
    ) -> Result<usize, GalleryError> {
        let pdfium = self.bind()?;
        let document = self.load(&pdfium, pdf)?;
        let total = document.pages().len() as usize;
        info!("PDF loaded: {} pages", total);
        on_event(RenderEvent::PageCount(total))?;

        for index in 0..total {
            let image = self.render_loaded(&document, index, scale)?;
            on_event(RenderEvent::Page { index, image })?;
        }
        Ok(total)
    }
}

impl PdfiumRasterizer {
    fn render_loaded(
        &self,
        document: &PdfDocument<'_>,
        index: usize,
        scale: f32,
    ) -> Result<DynamicImage, GalleryError> {
        let page_index = u16::try_from(index).map_err(|_| GalleryError::RasterisationFailed {
            page: index + 1,
            detail: "page index exceeds pdfium's range".into(),
        })?;
        let page = document
            .pages()
            .get(page_index)
            .map_err(|e| GalleryError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let mut render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        if let Some(max) = self.max_rendered_pixels {
            render_config = render_config
                .set_maximum_width(max as i32)
                .set_maximum_height(max as i32);
        }

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            GalleryError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} at {}x → {}x{} px",
            index + 1,
            scale,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}
