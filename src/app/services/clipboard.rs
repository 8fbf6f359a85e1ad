use regex_lite::Regex;

use super::sequence::{ClipboardSequenceManager, SequenceOptions};
use super::tags::TagReplacer;

/// What to do after a global paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextClipboardDecision {
    /// If set, put this text on the clipboard for the next paste.
    pub next_text: Option<String>,
    /// If true, the caller should stop listening for global pastes.
    pub should_stop_listener: bool,
}

/// Orchestrates clipboard-driven flows: sequence paste and list paste.
///
/// Contains no UI code. The shell reads/writes the actual OS clipboard
/// and starts/stops the paste observer; this service is pure decision
/// logic and state transitions. At most one list paste and one sequence
/// may be active at a time, and both may be active together - list paste
/// takes priority, and the listener only stops once *both* are finished,
/// so a list paste with a trailing sequence works without one silently
/// cancelling the other.
pub struct ClipboardService {
    sequence: Option<ClipboardSequenceManager>,
    list_items: Vec<String>,
    list_index: usize,
    list_active: bool,
}

impl Default for ClipboardService {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardService {
    pub fn new() -> Self {
        Self {
            sequence: None,
            list_items: Vec::new(),
            list_index: 0,
            list_active: false,
        }
    }

    // ---------- List paste ----------

    /// Extract plain items from a markdown-like list selection.
    ///
    /// Splits on lines, trims, strips one leading marker (`-`, `*`, `+`,
    /// `1.` or `1)`), drops lines that end up empty, keeps order and
    /// duplicates.
    pub fn parse_list_items(selected: &str) -> Vec<String> {
        let marker = Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+").unwrap();
        let mut results = Vec::new();
        for raw in selected.lines() {
            let stripped = raw.trim();
            if stripped.is_empty() {
                continue;
            }
            let cleaned = marker.replace(stripped, "");
            let cleaned = cleaned.trim();
            if !cleaned.is_empty() {
                results.push(cleaned.to_string());
            }
        }
        results
    }

    /// Begin a list paste session. Returns the first item to seed the
    /// clipboard, or `None` for an empty list.
    pub fn start_list_paste(&mut self, items: Vec<String>) -> Option<String> {
        self.list_items = items;
        self.list_index = 0;
        self.list_active = !self.list_items.is_empty();
        if self.list_active {
            Some(self.list_items[0].clone())
        } else {
            None
        }
    }

    pub fn stop_list_paste(&mut self) {
        self.list_active = false;
        self.list_items.clear();
        self.list_index = 0;
    }

    pub fn list_paste_active(&self) -> bool {
        self.list_active
    }

    // ---------- Sequence ----------

    /// Begin a sequence paste session. Returns the first clipboard value.
    pub fn start_sequence(&mut self, initial: &str, options: SequenceOptions) -> String {
        let mut mgr = ClipboardSequenceManager::new();
        let first = mgr.set_initial(initial, options);
        self.sequence = Some(mgr);
        first
    }

    /// Same as `start_sequence` but with an injected tag replacer.
    pub fn start_sequence_with_tagger(
        &mut self,
        initial: &str,
        options: SequenceOptions,
        tagger: TagReplacer,
    ) -> String {
        let mut mgr = ClipboardSequenceManager::with_tagger(tagger);
        let first = mgr.set_initial(initial, options);
        self.sequence = Some(mgr);
        first
    }

    pub fn clear_sequence(&mut self) {
        self.sequence = None;
    }

    pub fn sequence_active(&self) -> bool {
        self.sequence.is_some()
    }

    // ---------- Global paste event handling ----------

    /// Given the current clipboard contents, decide the next action.
    ///
    /// Priority:
    /// 1. If list paste is active, advance to the next item.
    /// 2. Else if a sequence is active, compute the next sequence value.
    /// 3. Otherwise, request that the listener stop.
    pub fn compute_next_clipboard(&mut self, current_clipboard: &str) -> NextClipboardDecision {
        // 1) List paste mode takes precedence
        if self.list_active {
            self.list_index += 1;
            if self.list_index >= self.list_items.len() {
                // Completed; stop list mode. Keep listener only if a sequence continues.
                self.stop_list_paste();
                return NextClipboardDecision {
                    next_text: None,
                    should_stop_listener: self.sequence.is_none(),
                };
            }
            return NextClipboardDecision {
                next_text: Some(self.list_items[self.list_index].clone()),
                should_stop_listener: false,
            };
        }

        // 2) Sequence mode
        let Some(sequence) = self.sequence.as_mut() else {
            return NextClipboardDecision {
                next_text: None,
                should_stop_listener: true,
            };
        };

        match sequence.on_paste(current_clipboard) {
            Some(next) => NextClipboardDecision {
                next_text: Some(next),
                should_stop_listener: false,
            },
            None => {
                // Clipboard diverged; drop the sequence
                self.sequence = None;
                NextClipboardDecision {
                    next_text: None,
                    should_stop_listener: !self.list_active,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_transform() -> SequenceOptions {
        SequenceOptions {
            auto_increment: false,
            ordinal_only: true,
            replace_tags: false,
            increment_text: true,
        }
    }

    #[test]
    fn test_parse_list_items_strips_markers() {
        let items = ClipboardService::parse_list_items("- a\n2) b\n\n3. c");
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_list_items_keeps_order_and_duplicates() {
        let items = ClipboardService::parse_list_items("* x\n* x\n+ y\n  - z");
        assert_eq!(items, vec!["x", "x", "y", "z"]);
    }

    #[test]
    fn test_parse_list_items_plain_lines_survive() {
        let items = ClipboardService::parse_list_items("no marker\n-dashed-but-not-list");
        assert_eq!(items, vec!["no marker", "-dashed-but-not-list"]);
    }

    #[test]
    fn test_parse_list_items_marker_only_lines_dropped() {
        let items = ClipboardService::parse_list_items("- \n1. \nitem");
        assert_eq!(items, vec!["item"]);
    }

    #[test]
    fn test_start_list_paste_returns_first_item() {
        let mut svc = ClipboardService::new();
        let first = svc.start_list_paste(vec!["a".into(), "b".into()]);
        assert_eq!(first.as_deref(), Some("a"));
        assert!(svc.list_paste_active());

        assert_eq!(svc.start_list_paste(Vec::new()), None);
        assert!(!svc.list_paste_active());
    }

    #[test]
    fn test_list_paste_advances_then_stops() {
        let mut svc = ClipboardService::new();
        svc.start_list_paste(vec!["a".into(), "b".into()]);

        let d1 = svc.compute_next_clipboard("a");
        assert_eq!(d1.next_text.as_deref(), Some("b"));
        assert!(!d1.should_stop_listener);

        // Exhausted and no sequence: stop
        let d2 = svc.compute_next_clipboard("b");
        assert_eq!(d2.next_text, None);
        assert!(d2.should_stop_listener);
        assert!(!svc.list_paste_active());
    }

    #[test]
    fn test_list_exhaustion_keeps_listener_while_sequence_active() {
        let mut svc = ClipboardService::new();
        svc.start_list_paste(vec!["a".into(), "b".into()]);
        svc.start_sequence("Item 1", no_transform());

        svc.compute_next_clipboard("a");
        let exhausted = svc.compute_next_clipboard("b");
        assert_eq!(exhausted.next_text, None);
        // A sequence is still armed: keep listening
        assert!(!exhausted.should_stop_listener);
        assert!(svc.sequence_active());

        // Exhausting the sequence too finally stops the listener
        let diverged = svc.compute_next_clipboard("not what the sequence wrote");
        assert!(diverged.should_stop_listener);
        assert!(!svc.sequence_active());
    }

    #[test]
    fn test_sequence_decision_flow() {
        let mut svc = ClipboardService::new();
        let first = svc.start_sequence("x", no_transform());
        assert_eq!(first, "x");

        let d = svc.compute_next_clipboard("x");
        assert_eq!(d.next_text.as_deref(), Some("x"));
        assert!(!d.should_stop_listener);

        let diverged = svc.compute_next_clipboard("y");
        assert_eq!(diverged.next_text, None);
        assert!(diverged.should_stop_listener);
    }

    #[test]
    fn test_idle_service_stops_listener() {
        let mut svc = ClipboardService::new();
        let d = svc.compute_next_clipboard("anything");
        assert_eq!(d.next_text, None);
        assert!(d.should_stop_listener);
    }

    #[test]
    fn test_list_priority_over_sequence() {
        let mut svc = ClipboardService::new();
        svc.start_sequence("Item 1", no_transform());
        svc.start_list_paste(vec!["a".into(), "b".into()]);

        // While the list is active, the sequence is not consulted
        let d = svc.compute_next_clipboard("garbage");
        assert_eq!(d.next_text.as_deref(), Some("b"));
        assert!(svc.sequence_active());
    }
}
