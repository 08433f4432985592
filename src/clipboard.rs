//! Clipboard access for copying analysis results.
//!
//! The gallery writes through [`ClipboardSink`] so headless environments (CI,
//! servers) can plug in [`MemoryClipboard`] instead of the real system
//! clipboard.

use std::sync::Mutex;

/// Somewhere copied text can go.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), String>;
}

/// The desktop clipboard, via arboard.
///
/// A new handle is opened per copy: arboard handles are not `Sync` and some
/// platforms drop ownership when the handle goes away anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("Failed to access clipboard: {e}"))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| format!("Failed to copy to clipboard: {e}"))
    }
}

/// In-process clipboard that just remembers the last text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_copied(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), String> {
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
