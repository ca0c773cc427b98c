use crate::core::Clipboard;
use crate::utils::error::{OgError, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// Process-local clipboard. Cloning shares the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Stands in when no system clipboard is compiled in. Every write fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedClipboard;

impl Clipboard for UnsupportedClipboard {
    fn set_text(&self, _text: &str) -> Result<()> {
        Err(OgError::Clipboard {
            message: "built without the `clipboard` feature".to_string(),
        })
    }
}

/// The desktop clipboard. A fresh handle is opened per write since
/// `arboard::Clipboard` must not be shared across threads.
#[cfg(feature = "clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| OgError::Clipboard {
            message: e.to_string(),
        })?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| OgError::Clipboard {
                message: e.to_string(),
            })
    }
}
