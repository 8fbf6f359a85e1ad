use chrono::{Local, Timelike};

type TagFn = Box<dyn Fn() -> String>;

/// Replaces supported template tags in text.
///
/// The default instance knows one tag, `{min}`: the current wall-clock
/// minute zero-padded to two digits. More tags can be registered without
/// changing the calling contract. `replace` never fails; unrecognized
/// text passes through unchanged.
pub struct TagReplacer {
    tags: Vec<(String, TagFn)>,
}

impl Default for TagReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReplacer {
    pub fn new() -> Self {
        let mut replacer = Self::empty();
        replacer.register("min", || format!("{:02}", Local::now().minute()));
        replacer
    }

    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// Register a tag name (without braces) and its value producer.
    pub fn register<F>(&mut self, name: &str, produce: F)
    where
        F: Fn() -> String + 'static,
    {
        self.tags.push((format!("{{{}}}", name), Box::new(produce)));
    }

    pub fn replace(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (needle, produce) in &self.tags {
            if out.contains(needle.as_str()) {
                out = out.replace(needle.as_str(), &produce());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_without_tags_is_unchanged() {
        let tagger = TagReplacer::new();
        assert_eq!(tagger.replace("plain text"), "plain text");
        assert_eq!(tagger.replace(""), "");
        assert_eq!(tagger.replace("{unknown} stays"), "{unknown} stays");
    }

    #[test]
    fn test_min_tag_is_two_digits() {
        let tagger = TagReplacer::new();
        let out = tagger.replace("{min}");
        assert_eq!(out.len(), 2);
        assert!(out.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_injected_tag() {
        let mut tagger = TagReplacer::empty();
        tagger.register("min", || "42".to_string());
        assert_eq!(tagger.replace("at {min} past"), "at 42 past");
        assert_eq!(tagger.replace("{min}{min}"), "4242");
    }

    #[test]
    fn test_empty_replacer_is_identity() {
        let tagger = TagReplacer::empty();
        assert_eq!(tagger.replace("{min}"), "{min}");
    }
}
