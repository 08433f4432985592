//! Configuration types for the page gallery and the mock analysis endpoint.
//!
//! Gallery behaviour is controlled through [`GalleryConfig`], built via its
//! [`GalleryConfigBuilder`]. The endpoint has its own small [`ServerConfig`].

use crate::doc_type::DocType;
use crate::error::GalleryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default analysis endpoint, matching [`ServerConfig::default`].
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:3000/api/analyze";

/// Configuration for a [`crate::gallery::PageGallery`].
///
/// # Example
/// ```rust
/// use pdf_gallery::{DocType, GalleryConfig};
///
/// let config = GalleryConfig::builder()
///     .render_scale(2.0)
///     .endpoint_url("http://localhost:3000/api/analyze")
///     .initial_doc_type(DocType::Invoice)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Scale factor applied to each page's natural size. Range: 0.25–8.0. Default: 2.0.
    pub render_scale: f32,

    /// Optional cap on the longest rendered edge in pixels. Default: none.
    ///
    /// A 2× render of a poster-sized page can be enormous; the cap scales the
    /// other edge proportionally.
    pub max_rendered_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library.
    ///
    /// When unset, `PDFIUM_LIB_PATH` is consulted, then the system library.
    pub pdfium_library_path: Option<PathBuf>,

    /// URL of the analysis endpoint. Default: [`DEFAULT_ENDPOINT_URL`].
    pub endpoint_url: String,

    /// Per-request timeout for the analysis endpoint. Default: none.
    pub request_timeout_secs: Option<u64>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Directory that downloaded page images are written to. Default: `.`.
    pub download_dir: PathBuf,

    /// Document type selected before the user picks one. Default: `rawText`.
    pub initial_doc_type: DocType,

    /// Lifetime of transient notifications in milliseconds. Default: 2000.
    pub notification_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            max_rendered_pixels: None,
            password: None,
            pdfium_library_path: None,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            request_timeout_secs: None,
            download_timeout_secs: 120,
            download_dir: PathBuf::from("."),
            initial_doc_type: DocType::default(),
            notification_ms: 2000,
        }
    }
}

impl GalleryConfig {
    /// Create a new builder for `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GalleryConfig`].
#[derive(Debug)]
pub struct GalleryConfigBuilder {
    config: GalleryConfig,
}

impl GalleryConfigBuilder {
    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale.clamp(0.25, 8.0);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = dir.into();
        self
    }

    pub fn initial_doc_type(mut self, doc_type: DocType) -> Self {
        self.config.initial_doc_type = doc_type;
        self
    }

    pub fn notification_ms(mut self, ms: u64) -> Self {
        self.config.notification_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GalleryConfig, GalleryError> {
        let c = &self.config;
        if !c.render_scale.is_finite() || c.render_scale <= 0.0 {
            return Err(GalleryError::InvalidConfig(format!(
                "render scale must be positive, got {}",
                c.render_scale
            )));
        }
        if !(c.endpoint_url.starts_with("http://") || c.endpoint_url.starts_with("https://")) {
            return Err(GalleryError::InvalidConfig(format!(
                "endpoint URL must be http(s), got '{}'",
                c.endpoint_url
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(GalleryError::InvalidConfig(
                "request timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for the mock analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host. Default: `127.0.0.1`.
    pub host: String,
    /// Bind port. Default: 3000. Use 0 for an ephemeral port.
    pub port: u16,
    /// Simulated analysis latency in milliseconds. Default: 1000.
    pub analysis_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            analysis_delay_ms: 1000,
        }
    }
}
