use serde::{Deserialize, Serialize};

use super::increment::TextNumberIncrementer;
use super::tags::TagReplacer;

/// Transform options for a sequence paste, fixed when the sequence starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOptions {
    #[serde(default = "default_true")]
    pub auto_increment: bool,
    #[serde(default = "default_true")]
    pub ordinal_only: bool,
    #[serde(default = "default_true")]
    pub replace_tags: bool,
    #[serde(default = "default_true")]
    pub increment_text: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            auto_increment: true,
            ordinal_only: true,
            replace_tags: true,
            increment_text: true,
        }
    }
}

/// Manages a clipboard-driven text sequence with optional transforms.
///
/// Life cycle:
/// - `set_initial(...)` to establish the first clipboard value
/// - `on_paste(current_clipboard)` - if `current_clipboard` matches the
///   last value we generated, compute the next one and return it; if it
///   does not match, the clipboard was changed by someone else and the
///   sequence terminates (`None`).
///
/// The equality check against `last_generated` is the correctness-critical
/// invariant: the OS clipboard is shared mutable state that any other
/// application can overwrite between paste events, and comparing against
/// the last value we wrote is the only reliable way to tell "the user
/// pasted our value" apart from "something else happened".
pub struct ClipboardSequenceManager {
    tagger: TagReplacer,
    incrementer: TextNumberIncrementer,
    options: SequenceOptions,
    base_text: String,
    last_generated: Option<String>,
}

impl Default for ClipboardSequenceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSequenceManager {
    pub fn new() -> Self {
        Self::with_tagger(TagReplacer::new())
    }

    /// Build with a specific tag replacer (tests inject a frozen clock).
    pub fn with_tagger(tagger: TagReplacer) -> Self {
        Self {
            tagger,
            incrementer: TextNumberIncrementer::new(),
            options: SequenceOptions::default(),
            base_text: String::new(),
            last_generated: None,
        }
    }

    pub fn last_generated(&self) -> Option<&str> {
        self.last_generated.as_deref()
    }

    pub fn reset(&mut self) {
        self.base_text.clear();
        self.last_generated = None;
        self.options = SequenceOptions::default();
    }

    /// Arm the sequence. Returns the first clipboard value, which the
    /// caller is expected to seed the OS clipboard with.
    pub fn set_initial(&mut self, selected_text: &str, options: SequenceOptions) -> String {
        self.base_text = selected_text.to_string();
        self.options = options;
        let first = if options.replace_tags {
            self.tagger.replace(selected_text)
        } else {
            selected_text.to_string()
        };
        self.last_generated = Some(first.clone());
        first
    }

    /// Compute the next value after an observed paste. `None` signals
    /// termination; the caller must stop listening. Divergence never
    /// mutates `last_generated`.
    pub fn on_paste(&mut self, current_clipboard: &str) -> Option<String> {
        // Stop if clipboard was changed externally
        let last = self.last_generated.as_deref()?;
        if current_clipboard != last {
            return None;
        }

        let mut next = last.to_string();
        if self.options.auto_increment {
            next = self.incrementer.increment(
                &next,
                self.options.ordinal_only,
                self.options.increment_text,
            );
        }
        if self.options.replace_tags {
            next = self.tagger.replace(&next);
        }

        self.last_generated = Some(next.clone());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen_manager(minute: &'static str) -> ClipboardSequenceManager {
        let mut tagger = TagReplacer::empty();
        tagger.register("min", move || minute.to_string());
        ClipboardSequenceManager::with_tagger(tagger)
    }

    fn opts(
        auto_increment: bool,
        ordinal_only: bool,
        replace_tags: bool,
        increment_text: bool,
    ) -> SequenceOptions {
        SequenceOptions {
            auto_increment,
            ordinal_only,
            replace_tags,
            increment_text,
        }
    }

    #[test]
    fn test_basic_increment_and_tag() {
        let mut mgr = frozen_manager("42");
        let first = mgr.set_initial("Item 1 at {min}", opts(true, true, true, true));
        assert_eq!(first, "Item 1 at 42");

        // "42" itself gets incremented along with the item number
        let next = mgr.on_paste(&first).unwrap();
        assert_eq!(next, "Item 2 at 43");

        let next2 = mgr.on_paste(&next).unwrap();
        assert_eq!(next2, "Item 3 at 44");

        // If clipboard diverges, sequence stops
        assert_eq!(mgr.on_paste("external change"), None);
    }

    #[test]
    fn test_no_increment_repeats_value() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("Step 10", opts(false, true, false, true));
        assert_eq!(first, "Step 10");
        assert_eq!(mgr.on_paste(&first).unwrap(), "Step 10");
    }

    #[test]
    fn test_textual_ordinal_always_increments() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("first 1", opts(true, true, false, true));
        assert_eq!(first, "first 1");
        // Ordinal word and numeral both advance
        assert_eq!(mgr.on_paste(&first).unwrap(), "second 2");
    }

    #[test]
    fn test_ordinal_only_keeps_cardinals() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("one and first", opts(true, true, false, true));
        let next = mgr.on_paste(&first).unwrap();
        assert_eq!(next, "one and second");
    }

    #[test]
    fn test_increment_text_false_numeric_only() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("first 1", opts(true, false, false, false));
        assert_eq!(mgr.on_paste(&first).unwrap(), "first 2");
        assert_eq!(mgr.on_paste("first 2").unwrap(), "first 3");
    }

    #[test]
    fn test_divergence_does_not_mutate_last_generated() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("Item 7", opts(true, true, false, true));
        let next = mgr.on_paste(&first).unwrap();
        assert_eq!(next, "Item 8");
        assert_eq!(mgr.last_generated(), Some("Item 8"));

        assert_eq!(mgr.on_paste("Item 999"), None);
        assert_eq!(mgr.last_generated(), Some("Item 8"));
    }

    #[test]
    fn test_numeral_at_i64_max_repeats_instead_of_failing() {
        // Clipboard text is untrusted; a counter at the i64 ceiling must
        // not abort the sequence, it just stops advancing
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("Item 9223372036854775807", opts(true, true, false, true));
        assert_eq!(mgr.on_paste(&first).unwrap(), "Item 9223372036854775807");
        assert_eq!(
            mgr.on_paste("Item 9223372036854775807").unwrap(),
            "Item 9223372036854775807"
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut mgr = frozen_manager("00");
        let first = mgr.set_initial("A 1", opts(true, true, false, true));
        assert_eq!(mgr.on_paste(&first).unwrap(), "A 2");

        mgr.reset();
        assert_eq!(mgr.last_generated(), None);
        assert_eq!(mgr.on_paste("anything"), None);

        // New sequence after reset works independently of prior options
        let first2 = mgr.set_initial("B 10", opts(false, true, false, true));
        assert_eq!(first2, "B 10");
        assert_eq!(mgr.on_paste(&first2).unwrap(), "B 10");
    }

    #[test]
    fn test_unarmed_manager_terminates_immediately() {
        let mut mgr = frozen_manager("00");
        assert_eq!(mgr.on_paste("whatever"), None);
    }
}
