//! CLI binary for pdf-gallery.
//!
//! A thin shim over the library crate: `serve` runs the mock analysis
//! endpoint, `render` and `analyze` drive a [`PageGallery`] headlessly.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_gallery::{
    server, Analyzer, DocType, GalleryConfig, GalleryProgressCallback, HttpAnalyzer, LlmAnalyzer,
    PageGallery, PdfiumRasterizer, ProgressCallback, ServerConfig, DEFAULT_ENDPOINT_URL,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Spinner while the PDF opens, then a bar once the page count is known.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl GalleryProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_rendered(&self, _page_num: usize, _total_pages: usize) {
        self.bar.inc(1);
    }

    fn on_upload_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }

    fn on_upload_failed(&self, rendered: usize, error: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}  {}", red("✘"), red(error), dim(&format!("({rendered} kept)")));
    }

    fn on_analysis_start(&self, page_num: usize, doc_type: DocType) {
        self.bar.reset();
        self.bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        self.bar.set_prefix("Analysing");
        self.bar
            .set_message(format!("page {page_num} as {}", doc_type.label()));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_analysis_complete(&self, page_num: usize, result: Result<usize, &str>) {
        self.bar.finish_and_clear();
        match result {
            Ok(len) => eprintln!(
                "  {} Page {:>3}  {}",
                green("✓"),
                page_num,
                dim(&format!("{len:>5} chars"))
            ),
            Err(e) => eprintln!("  {} Page {:>3}  {}", red("✗"), page_num, red(e)),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the mock analysis endpoint on :3000
  pdf-gallery serve

  # Render every page to PNG files
  pdf-gallery render document.pdf --out pages/

  # Analyse page 2 as an invoice against the mock endpoint
  pdf-gallery analyze invoice.pdf --page 2 --doc-type invoice

  # Analyse with a real vision model instead
  pdf-gallery analyze paper.pdf --llm --provider openai --model gpt-4.1-nano

  # List document types
  pdf-gallery doc-types

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  OPENAI_API_KEY          OpenAI API key (--llm)
  ANTHROPIC_API_KEY       Anthropic API key (--llm)
  GEMINI_API_KEY          Google Gemini API key (--llm)
  RUST_LOG                Override log filter
"#;

/// Browse PDF pages as images and analyse them.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-gallery",
    version,
    about = "Render PDF pages to images and analyse them into markdown",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF_GALLERY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF_GALLERY_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the mock analysis endpoint.
    Serve {
        #[arg(long, env = "PDF_GALLERY_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, env = "PDF_GALLERY_PORT", default_value_t = 3000)]
        port: u16,

        /// Simulated latency per analysis, in milliseconds.
        #[arg(long, env = "PDF_GALLERY_DELAY_MS", default_value_t = 1000)]
        delay_ms: u64,
    },

    /// Render every page and save each as page_{n}.png.
    Render {
        #[command(flatten)]
        pdf: PdfArgs,

        /// Directory to save pages into.
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Render a PDF, then analyse one page.
    Analyze {
        #[command(flatten)]
        pdf: PdfArgs,

        /// 1-indexed page to analyse.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Document type tag (see `doc-types`).
        #[arg(long, default_value = "rawText")]
        doc_type: DocType,

        /// Analysis endpoint URL.
        #[arg(long, env = "PDF_GALLERY_ENDPOINT", default_value = DEFAULT_ENDPOINT_URL)]
        endpoint: String,

        /// Per-request timeout in seconds (none by default).
        #[arg(long, env = "PDF_GALLERY_TIMEOUT")]
        timeout: Option<u64>,

        /// Call a vision LLM directly instead of the endpoint.
        #[arg(long)]
        llm: bool,

        /// LLM provider (with --llm).
        #[arg(long, env = "EDGEQUAKE_PROVIDER", requires = "llm")]
        provider: Option<String>,

        /// LLM model ID (with --llm).
        #[arg(long, env = "EDGEQUAKE_MODEL", requires = "llm")]
        model: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Also copy the markdown to the system clipboard.
        #[arg(long)]
        copy: bool,
    },

    /// List the available document types.
    DocTypes,
}

#[derive(clap::Args, Debug)]
struct PdfArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Render scale (1.0 = 72 DPI).
    #[arg(long, env = "PDF_GALLERY_SCALE", default_value_t = 2.0)]
    scale: f32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_GALLERY_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium (file or directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF_GALLERY_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The progress bar carries the feedback; keep library logs quiet under it.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || !matches!(cli.command, Command::Serve { .. }) {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve {
            host,
            port,
            delay_ms,
        } => {
            let config = ServerConfig {
                host,
                port,
                analysis_delay_ms: delay_ms,
            };
            server::serve(&config)
                .await
                .context("Analysis endpoint failed")?;
        }

        Command::Render { pdf, out } => {
            let config = gallery_config(&pdf, None, None, Some(out))?;
            let gallery = PageGallery::from_config(config)
                .context("Failed to create gallery")?
                .with_progress(progress(cli.quiet));

            let total = upload(&gallery, &pdf.input).await?;
            for index in 0..total {
                let path = gallery
                    .download_page(index)
                    .await
                    .with_context(|| format!("Failed to save page {}", index + 1))?;
                if !cli.quiet {
                    eprintln!("  {} {}", green("✓"), path.display());
                }
            }
        }

        Command::Analyze {
            pdf,
            page,
            doc_type,
            endpoint,
            timeout,
            llm,
            provider,
            model,
            json,
            copy,
        } => {
            if page < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
            }
            let config = gallery_config(&pdf, Some(endpoint), timeout, None)?;
            let analyzer: Arc<dyn Analyzer> = if llm {
                Arc::new(
                    LlmAnalyzer::from_env(provider.as_deref(), model.as_deref())
                        .context("Failed to initialise LLM provider")?,
                )
            } else {
                Arc::new(HttpAnalyzer::from_config(&config).context("Failed to build HTTP client")?)
            };
            let rasterizer = Arc::new(PdfiumRasterizer::from_config(&config));
            let gallery =
                PageGallery::new(config, rasterizer, analyzer).with_progress(progress(cli.quiet));

            upload(&gallery, &pdf.input).await?;
            let result = gallery
                .choose_prompt(page - 1, doc_type)
                .await
                .context("Analysis failed")?
                .context("Another analysis is already running")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("Failed to serialise result")?
                );
            } else {
                println!("{}  {}\n", bold(&result.heading()), dim(&result.badge()));
                println!("{}", result.content);
            }

            if copy {
                gallery
                    .copy_analysis(&result.content)
                    .context("Failed to copy text")?;
                if !cli.quiet {
                    eprintln!("{} Analysis copied to clipboard!", green("✔"));
                }
            }
        }

        Command::DocTypes => {
            for doc_type in DocType::ALL {
                println!("{:<16} {}", doc_type.tag(), doc_type.label());
            }
        }
    }

    Ok(())
}

fn progress(quiet: bool) -> ProgressCallback {
    if quiet {
        Arc::new(pdf_gallery::NoopProgressCallback)
    } else {
        CliProgressCallback::new()
    }
}

/// Map CLI args to `GalleryConfig`.
fn gallery_config(
    pdf: &PdfArgs,
    endpoint: Option<String>,
    timeout: Option<u64>,
    download_dir: Option<PathBuf>,
) -> Result<GalleryConfig> {
    let mut builder = GalleryConfig::builder()
        .render_scale(pdf.scale)
        .download_timeout_secs(pdf.download_timeout);
    if let Some(ref password) = pdf.password {
        builder = builder.password(password.clone());
    }
    if let Some(ref path) = pdf.pdfium {
        builder = builder.pdfium_library_path(path.clone());
    }
    if let Some(url) = endpoint {
        builder = builder.endpoint_url(url);
    }
    if let Some(secs) = timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(dir) = download_dir {
        builder = builder.download_dir(dir);
    }
    builder.build().context("Invalid configuration")
}

async fn upload(gallery: &PageGallery, input: &str) -> Result<usize> {
    let total = gallery
        .upload_file(input)
        .await
        .with_context(|| format!("Failed to load '{input}'"))?
        .context("A conversion is already running")?;
    if let Some(message) = gallery.snapshot().completion_message() {
        tracing::info!("{}", message);
    }
    Ok(total)
}
