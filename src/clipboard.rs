//! Clipboard access
//!
//! [`SystemClipboard`] writes text to the desktop clipboard through `arboard`
//! (X11 and Wayland on Linux, the pasteboard on macOS, the Win32 clipboard on
//! Windows). A failure is reported to the caller and never touches session
//! state.

use crate::error::{EasyRegError, EasyRegResult};
use tracing::debug;

/// Something that can receive copied text
pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> EasyRegResult<()>;
}

/// In-memory clipboard, keeps the last copied text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> EasyRegResult<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The desktop clipboard.
///
/// The OS handle is opened on the first copy and kept afterwards. On X11 the
/// copied text is served by this handle, so it stays pasteable for as long
/// as the value lives (or until a clipboard manager takes it over).
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the OS clipboard has been opened yet
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn handle(&mut self) -> EasyRegResult<&mut arboard::Clipboard> {
        if self.handle.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(unavailable)?;
            debug!("clipboard opened");
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| EasyRegError::Clipboard("clipboard unavailable".to_string()))
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.is_open())
            .finish()
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> EasyRegResult<()> {
        self.handle()?.set_text(text).map_err(write_failed)?;
        debug!(bytes = text.len(), "copied to clipboard");
        Ok(())
    }
}

fn unavailable(e: arboard::Error) -> EasyRegError {
    EasyRegError::Clipboard(format!("clipboard unavailable: {}", e))
}

fn write_failed(e: arboard::Error) -> EasyRegError {
    EasyRegError::Clipboard(format!("failed to set clipboard text: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_last_copy() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.copy_text("first").unwrap();
        clipboard.copy_text("second").unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("second"));
    }

    #[test]
    fn test_system_clipboard_opens_lazily() {
        let clipboard = SystemClipboard::new();
        assert!(!clipboard.is_open());
        assert_eq!(format!("{:?}", clipboard), "SystemClipboard { open: false }");
    }

    #[test]
    fn test_arboard_errors_map_to_clipboard_errors() {
        match unavailable(arboard::Error::ClipboardNotSupported) {
            EasyRegError::Clipboard(msg) => assert!(msg.starts_with("clipboard unavailable")),
            other => panic!("Expected clipboard error, got {other:?}"),
        }
        match write_failed(arboard::Error::ContentNotAvailable) {
            EasyRegError::Clipboard(msg) => {
                assert!(msg.starts_with("failed to set clipboard text"))
            }
            other => panic!("Expected clipboard error, got {other:?}"),
        }
    }

    #[test]
    fn test_system_clipboard_failure_is_a_clipboard_error() {
        // Headless machines have no clipboard; either outcome must be clean
        let mut clipboard = SystemClipboard::new();
        match clipboard.copy_text("Hi Ann\nHi Bo") {
            Ok(()) => assert!(clipboard.is_open()),
            Err(EasyRegError::Clipboard(_)) => {}
            Err(other) => panic!("Expected clipboard error, got {other:?}"),
        }
    }
}
