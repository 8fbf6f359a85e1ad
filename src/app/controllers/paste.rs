use std::time::{Duration, Instant};

use crate::app::infrastructure::clipboard::ClipboardAccess;
use crate::app::infrastructure::error::Result;
use crate::app::services::clipboard::ClipboardService;
use crate::app::services::sequence::SequenceOptions;

/// Clipboard-change notifications arriving this soon after one of our
/// own clipboard writes are echoes of that write, not user activity.
/// Only change notifications are filtered: a paste keystroke is always
/// a user action and is never suppressed.
const SELF_WRITE_SUPPRESS: Duration = Duration::from_millis(300);

/// Drives the clipboard flows against the real OS clipboard.
///
/// `ClipboardService` makes the decisions; this controller performs the
/// reads and writes, tracks whether paste events should be observed at
/// all, and filters change-notification echoes caused by its own writes.
pub struct PasteController {
    service: ClipboardService,
    clipboard: Box<dyn ClipboardAccess>,
    pub listening: bool,
    ignore_until: Option<Instant>,
}

impl PasteController {
    pub fn new(clipboard: Box<dyn ClipboardAccess>) -> Self {
        Self {
            service: ClipboardService::new(),
            clipboard,
            listening: false,
            ignore_until: None,
        }
    }

    /// Arm a sequence paste from whatever is currently on the
    /// clipboard. Seeds the clipboard with the first generated value.
    pub fn start_sequence(&mut self, options: SequenceOptions) -> Result<()> {
        let base = self.clipboard.read()?;
        let first = self.service.start_sequence(&base, options);
        self.write_own(&first, Instant::now())?;
        self.listening = true;
        Ok(())
    }

    /// Arm a list paste from the given selection. Returns false when
    /// the selection holds no items.
    pub fn start_list_paste(&mut self, selected: &str) -> Result<bool> {
        let items = ClipboardService::parse_list_items(selected);
        match self.service.start_list_paste(items) {
            Some(first) => {
                self.write_own(&first, Instant::now())?;
                self.listening = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Cancel both flows and stop observing pastes.
    pub fn stop(&mut self) {
        self.service.stop_list_paste();
        self.service.clear_sequence();
        self.listening = false;
        self.ignore_until = None;
    }

    pub fn sequence_active(&self) -> bool {
        self.service.sequence_active()
    }

    pub fn list_paste_active(&self) -> bool {
        self.service.list_paste_active()
    }

    /// React to an in-app paste keystroke. Keystrokes come from the
    /// user, never from our own writes, so no echo filtering applies.
    pub fn handle_paste_event(&mut self) -> Result<()> {
        self.paste_event_at(Instant::now())
    }

    /// React to a clipboard-change notification from a platform
    /// observer. Changes inside the suppression window are echoes of
    /// the controller's own last write and are dropped.
    pub fn handle_clipboard_change(&mut self) -> Result<()> {
        self.change_event_at(Instant::now())
    }

    fn change_event_at(&mut self, now: Instant) -> Result<()> {
        if let Some(until) = self.ignore_until {
            if now < until {
                return Ok(());
            }
            self.ignore_until = None;
        }
        self.paste_event_at(now)
    }

    fn paste_event_at(&mut self, now: Instant) -> Result<()> {
        if !self.listening {
            return Ok(());
        }
        let observed = self.clipboard.read()?;
        let decision = self.service.compute_next_clipboard(&observed);
        if let Some(next) = decision.next_text {
            self.write_own(&next, now)?;
        }
        if decision.should_stop_listener {
            self.listening = false;
        }
        Ok(())
    }

    fn write_own(&mut self, text: &str, now: Instant) -> Result<()> {
        self.clipboard.write(text)?;
        self.ignore_until = Some(now + SELF_WRITE_SUPPRESS);
        Ok(())
    }
}
