use arboard::Clipboard;

use super::error::{AppError, Result};

/// Access to the OS clipboard, behind a trait so clipboard flows can be
/// tested without touching the real clipboard.
///
/// This is assumed to be the only channel through which the paste
/// sequence feature communicates with the rest of the OS.
pub trait ClipboardAccess {
    fn read(&mut self) -> Result<String>;
    fn write(&mut self, text: &str) -> Result<()>;
}

/// The real OS clipboard via arboard.
///
/// A fresh `Clipboard` handle is created per operation; arboard handles
/// are cheap and some platforms invalidate long-lived ones.
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        let mut cb = Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        cb.get_text().map_err(|e| AppError::Clipboard(e.to_string()))
    }

    fn write(&mut self, text: &str) -> Result<()> {
        let mut cb = Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        cb.set_text(text.to_string())
            .map_err(|e| AppError::Clipboard(e.to_string()))
    }
}

/// In-memory clipboard used by tests and by platforms where the real
/// clipboard is unavailable.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    pub fn new(initial: &str) -> Self {
        Self {
            contents: initial.to_string(),
        }
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn read(&mut self) -> Result<String> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.contents = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut cb = MemoryClipboard::new("seed");
        assert_eq!(cb.read().unwrap(), "seed");
        cb.write("next").unwrap();
        assert_eq!(cb.read().unwrap(), "next");
    }
}
