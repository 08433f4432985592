//! Pipeline stages the gallery controller drives.
//!
//! Each submodule implements one step, so each can be tested on its own and
//! swapped (e.g. a different rasteriser or analyser) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ analyze ──▶ (postprocess)
//! (path/URL)  (pdfium)  (data URL)  (endpoint / VLM)
//! ```
//!
//! 1. [`input`]   — read a local path or URL into PDF bytes
//! 2. [`render`]  — rasterise one page at a time; blocking, so the controller
//!    calls it via `spawn_blocking`
//! 3. [`encode`]  — PNG-encode a page into a data URL, and decode it again for
//!    downloads
//! 4. [`analyze`] — send a page to the analysis endpoint or a vision LLM
//! 5. [`postprocess`] — tidy LLM markdown

pub mod analyze;
pub mod encode;
pub mod input;
pub mod postprocess;
pub mod render;
