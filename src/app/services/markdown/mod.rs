//! Markdown span classification.
//!
//! Turns buffer text into a flat set of styled spans plus the
//! interactive (clickable) regions found along the way. Regex-driven
//! and line-oriented: close enough for live highlighting, nowhere near
//! CommonMark, by design.

mod code_tokens;
mod patterns;

pub use code_tokens::{CodeTokenLexer, SyntectTokenLexer, TokenFragment};
pub use patterns::MarkdownPatterns;

use crate::app::domain::span::{
    CodeRunInteraction, LinkInteraction, Span, SpanCategory,
};

/// Languages whose fenced blocks get a clickable "run" region.
const RUNNABLE_LANGUAGES: [&str; 4] = ["python", "py", "py3", "py2"];

/// Code bodies above this size skip token lexing for responsiveness.
const MAX_LEXED_BODY_BYTES: usize = 20_000;

/// Everything one classification pass produces. Offsets are byte
/// offsets into the UTF-8 text the pass was given. The result fully
/// replaces any previous pass; nothing accumulates across calls.
#[derive(Debug, Default)]
pub struct ClassifyResult {
    pub spans: Vec<Span>,
    pub links: Vec<LinkInteraction>,
    pub code_runs: Vec<CodeRunInteraction>,
}

pub struct MarkdownClassifier {
    patterns: MarkdownPatterns,
    lexer: Option<Box<dyn CodeTokenLexer>>,
}

impl Default for MarkdownClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownClassifier {
    /// Classifier without token-level code coloring.
    pub fn new() -> Self {
        Self {
            patterns: MarkdownPatterns::new(),
            lexer: None,
        }
    }

    /// Classifier with a token lexer for fenced code bodies.
    pub fn with_lexer(lexer: Box<dyn CodeTokenLexer>) -> Self {
        Self {
            patterns: MarkdownPatterns::new(),
            lexer: Some(lexer),
        }
    }

    /// Run every detector over `text` and compose the results.
    ///
    /// Idempotent: the same text always yields the same spans and the
    /// same interactive regions. Detector order only affects which
    /// composite spans exist; the detectors themselves are independent.
    pub fn classify(&self, text: &str) -> ClassifyResult {
        let mut result = ClassifyResult::default();
        let mut next_region_id = 0;

        self.detect_fenced_code(text, &mut result, &mut next_region_id);
        let heading_spans = self.detect_headings(text, &mut result);
        let (bold_spans, italic_spans) = self.detect_emphasis(text, &mut result);

        // Composite spans for geometric intersections
        for &(bs, be) in &bold_spans {
            for &(is, ie) in &italic_spans {
                let s = bs.max(is);
                let e = be.min(ie);
                push_span(&mut result.spans, SpanCategory::BoldItalic, s, e);
            }
        }
        for &(hs, he, level) in &heading_spans {
            for &(is, ie) in &italic_spans {
                let s = hs.max(is);
                let e = he.min(ie);
                push_span(&mut result.spans, SpanCategory::HeadingItalic(level), s, e);
            }
        }

        self.detect_misc_inline(text, &mut result);
        self.detect_lists(text, &mut result);
        self.detect_links(text, &mut result, &mut next_region_id);

        result
    }

    fn detect_fenced_code(
        &self,
        text: &str,
        result: &mut ClassifyResult,
        next_region_id: &mut usize,
    ) {
        for (index, caps) in self.patterns.fenced_code.captures_iter(text).enumerate() {
            let whole = caps.get(0).unwrap();
            push_span(&mut result.spans, SpanCategory::CodeBlock, whole.start(), whole.end());

            let body = caps.get(2);
            let (body_start, body_end) = match body {
                Some(m) => (m.start(), m.end()),
                None => continue,
            };
            push_span(&mut result.spans, SpanCategory::CodeBody, body_start, body_end);

            // Trim the language token inside its raw match range
            let lang_match = caps.get(1);
            let mut lang_span = None;
            let lang_raw = lang_match.map(|m| m.as_str().trim()).unwrap_or("");
            if let Some(m) = lang_match {
                if !lang_raw.is_empty() {
                    let full = m.as_str();
                    let ltrim = full.len() - full.trim_start().len();
                    let rtrim = full.len() - full.trim_end().len();
                    let s = m.start() + ltrim;
                    let e = m.end() - rtrim;
                    push_span(&mut result.spans, SpanCategory::CodeLang, s, e);
                    lang_span = Some((s, e));
                }
            }

            self.emit_code_tokens(text, body_start, body_end, lang_raw, result);

            let lang_lower = lang_raw.to_lowercase();
            if RUNNABLE_LANGUAGES.contains(&lang_lower.as_str()) {
                // The clickable area is the language label when present,
                // else the body itself
                let run_span = lang_span.unwrap_or((body_start, body_end));
                let block_region_id = bump(next_region_id);
                let body_region_id = bump(next_region_id);
                let run_region_id = bump(next_region_id);
                result.code_runs.push(CodeRunInteraction {
                    language: lang_lower,
                    block_region_id,
                    body_region_id,
                    run_region_id,
                    index,
                    block_span: (whole.start(), whole.end()),
                    body_span: (body_start, body_end),
                    run_span,
                });
            }
        }
    }

    /// Token coloring inside a code body. Entirely best-effort: any
    /// lexer failure degrades to "no token spans" without touching the
    /// rest of the pass.
    fn emit_code_tokens(
        &self,
        text: &str,
        body_start: usize,
        body_end: usize,
        lang_raw: &str,
        result: &mut ClassifyResult,
    ) {
        let Some(lexer) = self.lexer.as_deref() else {
            return;
        };
        let body = &text[body_start..body_end];
        // Skip very large blocks for responsiveness
        if body.len() > MAX_LEXED_BODY_BYTES {
            return;
        }
        let hint = if lang_raw.is_empty() { None } else { Some(lang_raw) };
        let Some(fragments) = lexer.tokens(body, hint) else {
            return;
        };
        for (start, end, kind) in fragments {
            if end <= body.len() {
                push_span(
                    &mut result.spans,
                    SpanCategory::CodeToken(kind),
                    body_start + start,
                    body_start + end,
                );
            }
        }
    }

    fn detect_headings(&self, text: &str, result: &mut ClassifyResult) -> Vec<(usize, usize, u8)> {
        let mut heading_spans = Vec::new();
        for caps in self.patterns.heading.captures_iter(text) {
            let hashes = caps.get(1).unwrap();
            let heading_text = caps.get(2).unwrap();
            let level = hashes.as_str().len().min(6) as u8;
            push_span(
                &mut result.spans,
                SpanCategory::Heading(level),
                heading_text.start(),
                heading_text.end(),
            );
            heading_spans.push((heading_text.start(), heading_text.end(), level));
        }
        heading_spans
    }

    /// Bold, italic, and literal bold-italic. Returns the raw bold and
    /// italic ranges so the caller can compute intersections.
    #[allow(clippy::type_complexity)]
    fn detect_emphasis(
        &self,
        text: &str,
        result: &mut ClassifyResult,
    ) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        let mut bold_spans = Vec::new();
        let mut italic_spans = Vec::new();

        for caps in self.patterns.bold_italic.captures_iter(text) {
            let m = caps.get(1).or_else(|| caps.get(2)).unwrap();
            push_span(&mut result.spans, SpanCategory::BoldItalic, m.start(), m.end());
            bold_spans.push((m.start(), m.end()));
            italic_spans.push((m.start(), m.end()));
        }
        for caps in self.patterns.bold.captures_iter(text) {
            let m = caps.get(1).or_else(|| caps.get(2)).unwrap();
            push_span(&mut result.spans, SpanCategory::Bold, m.start(), m.end());
            bold_spans.push((m.start(), m.end()));
        }
        for caps in self.patterns.italic.captures_iter(text) {
            let (m, delim) = match caps.get(1) {
                Some(m) => (m, b'*'),
                None => (caps.get(2).unwrap(), b'_'),
            };
            // Reject matches hugging another delimiter: those belong to
            // bold/bold-italic markers, which the original excluded with
            // lookaround
            let outer_start = m.start() - 1;
            let outer_end = m.end() + 1;
            let bytes = text.as_bytes();
            if outer_start > 0 && bytes[outer_start - 1] == delim {
                continue;
            }
            if outer_end < bytes.len() && bytes[outer_end] == delim {
                continue;
            }
            push_span(&mut result.spans, SpanCategory::Italic, m.start(), m.end());
            italic_spans.push((m.start(), m.end()));
        }

        (bold_spans, italic_spans)
    }

    fn detect_misc_inline(&self, text: &str, result: &mut ClassifyResult) {
        for caps in self.patterns.strike.captures_iter(text) {
            let m = caps.get(1).unwrap();
            push_span(&mut result.spans, SpanCategory::Strikethrough, m.start(), m.end());
        }
        for caps in self.patterns.inline_code.captures_iter(text) {
            let m = caps.get(1).unwrap();
            push_span(&mut result.spans, SpanCategory::InlineCode, m.start(), m.end());
        }
        for m in self.patterns.blockquote.find_iter(text) {
            push_span(&mut result.spans, SpanCategory::Blockquote, m.start(), m.end());
        }
    }

    fn detect_lists(&self, text: &str, result: &mut ClassifyResult) {
        for caps in self.patterns.ul_item.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            push_span(&mut result.spans, SpanCategory::ListItem, whole.start(), whole.end());

            let indent = caps.get(1).map_or("", |m| m.as_str());
            let level = indent_level(indent);
            push_span(
                &mut result.spans,
                SpanCategory::ListLevel(level),
                whole.start(),
                whole.end(),
            );

            let marker = caps.get(2).unwrap();
            push_span(
                &mut result.spans,
                SpanCategory::UnorderedMarker,
                marker.start(),
                marker.end(),
            );
        }
        for caps in self.patterns.ol_item.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            push_span(&mut result.spans, SpanCategory::ListItem, whole.start(), whole.end());

            let indent = caps.get(1).map_or("", |m| m.as_str());
            let level = indent_level(indent);
            push_span(
                &mut result.spans,
                SpanCategory::ListLevel(level),
                whole.start(),
                whole.end(),
            );

            // Marker is the numeral plus its trailing period
            let num = caps.get(2).unwrap();
            let mut marker_end = num.end();
            if text.as_bytes().get(marker_end) == Some(&b'.') {
                marker_end += 1;
            }
            push_span(
                &mut result.spans,
                SpanCategory::OrderedMarker,
                num.start(),
                marker_end,
            );
        }
    }

    fn detect_links(&self, text: &str, result: &mut ClassifyResult, next_region_id: &mut usize) {
        for caps in self.patterns.link.captures_iter(text) {
            let label = caps.get(1).unwrap();
            let url = caps.get(2).unwrap();
            push_span(&mut result.spans, SpanCategory::LinkText, label.start(), label.end());
            push_span(&mut result.spans, SpanCategory::LinkUrl, url.start(), url.end());
            result.links.push(LinkInteraction {
                url: url.as_str().to_string(),
                region_id: bump(next_region_id),
                text_span: (label.start(), label.end()),
                url_span: (url.start(), url.end()),
            });
        }
    }
}

/// Append a span, dropping empty ones.
fn push_span(spans: &mut Vec<Span>, category: SpanCategory, start: usize, end: usize) {
    if start < end {
        spans.push(Span::new(category, start, end));
    }
}

fn bump(counter: &mut usize) -> usize {
    let id = *counter;
    *counter += 1;
    id
}

/// Estimate list nesting level from leading whitespace.
///
/// Tabs count as 4 columns, spaces as 1; each 2 columns is one level,
/// clamped to 0..=6.
fn indent_level(whitespace: &str) -> u8 {
    let columns: usize = whitespace
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();
    (columns / 2).min(6) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::span::TokenKind;

    fn categories(result: &ClassifyResult) -> Vec<SpanCategory> {
        result.spans.iter().map(|s| s.category).collect()
    }

    fn find_span(result: &ClassifyResult, category: SpanCategory) -> Option<Span> {
        result.spans.iter().copied().find(|s| s.category == category)
    }

    #[test]
    fn test_headings_levels_and_text_only_span() {
        let c = MarkdownClassifier::new();
        let text = "# One\n### Three\n####### SevenHashes\n";
        let r = c.classify(text);

        let h1 = find_span(&r, SpanCategory::Heading(1)).unwrap();
        assert_eq!(&text[h1.start..h1.end], "One");

        let h3 = find_span(&r, SpanCategory::Heading(3)).unwrap();
        assert_eq!(&text[h3.start..h3.end], "Three");

        // Seven hashes is not a heading at all
        assert!(find_span(&r, SpanCategory::Heading(6)).is_none());
    }

    #[test]
    fn test_unspaced_hashes_are_not_headings() {
        let c = MarkdownClassifier::new();
        let r = c.classify("#NoSpace\n");
        assert!(r.spans.is_empty());
    }

    #[test]
    fn test_bold_italic_and_composites() {
        let c = MarkdownClassifier::new();
        let text = "**bold** and *ital* and ***both***\n";
        let r = c.classify(text);

        let bold = find_span(&r, SpanCategory::Bold).unwrap();
        assert_eq!(&text[bold.start..bold.end], "bold");

        let italic = find_span(&r, SpanCategory::Italic).unwrap();
        assert_eq!(&text[italic.start..italic.end], "ital");

        let both = find_span(&r, SpanCategory::BoldItalic).unwrap();
        assert_eq!(&text[both.start..both.end], "both");
    }

    #[test]
    fn test_nested_italic_inside_bold_gets_composite() {
        let c = MarkdownClassifier::new();
        let text = "**bold and *nested* italic**\n";
        let r = c.classify(text);

        // The nested italic range must also carry a bold-italic span
        let italic = find_span(&r, SpanCategory::Italic).unwrap();
        assert_eq!(&text[italic.start..italic.end], "nested");
        let composite = r
            .spans
            .iter()
            .find(|s| s.category == SpanCategory::BoldItalic && s.start == italic.start)
            .unwrap();
        assert_eq!(composite.end, italic.end);
    }

    #[test]
    fn test_heading_italic_composite() {
        let c = MarkdownClassifier::new();
        let text = "## Heading with *flair* here\n";
        let r = c.classify(text);

        let composite = find_span(&r, SpanCategory::HeadingItalic(2)).unwrap();
        assert_eq!(&text[composite.start..composite.end], "flair");
    }

    #[test]
    fn test_underscore_emphasis() {
        let c = MarkdownClassifier::new();
        let text = "__bold__ and _ital_\n";
        let r = c.classify(text);
        assert!(find_span(&r, SpanCategory::Bold).is_some());
        let italic = find_span(&r, SpanCategory::Italic).unwrap();
        assert_eq!(&text[italic.start..italic.end], "ital");
    }

    #[test]
    fn test_strike_inline_code_blockquote() {
        let c = MarkdownClassifier::new();
        let text = "> quoted\n\n~~gone~~ and `code`\n";
        let r = c.classify(text);

        let quote = find_span(&r, SpanCategory::Blockquote).unwrap();
        assert_eq!(&text[quote.start..quote.end], "> quoted");

        let strike = find_span(&r, SpanCategory::Strikethrough).unwrap();
        assert_eq!(&text[strike.start..strike.end], "gone");

        let code = find_span(&r, SpanCategory::InlineCode).unwrap();
        assert_eq!(&text[code.start..code.end], "code");
    }

    #[test]
    fn test_list_levels_and_markers() {
        let c = MarkdownClassifier::new();
        let text = "- top\n  - level1\n    - level2\n\t- tab\n1. ordered\n";
        let r = c.classify(text);

        let cats = categories(&r);
        assert!(cats.contains(&SpanCategory::ListLevel(0)));
        assert!(cats.contains(&SpanCategory::ListLevel(1)));
        assert!(cats.contains(&SpanCategory::ListLevel(2)));
        assert!(cats.contains(&SpanCategory::UnorderedMarker));

        let ol_marker = find_span(&r, SpanCategory::OrderedMarker).unwrap();
        assert_eq!(&text[ol_marker.start..ol_marker.end], "1.");

        // Tab indent counts as 4 columns = level 2
        let tab_line_start = text.find("\t- tab").unwrap();
        let tab_level = r
            .spans
            .iter()
            .filter(|s| matches!(s.category, SpanCategory::ListLevel(_)))
            .find(|s| s.start == tab_line_start)
            .unwrap();
        assert_eq!(tab_level.category, SpanCategory::ListLevel(2));
    }

    #[test]
    fn test_deep_indent_clamps_to_level_six() {
        let c = MarkdownClassifier::new();
        let text = format!("{}- deep\n", " ".repeat(40));
        let r = c.classify(&text);
        assert!(categories(&r).contains(&SpanCategory::ListLevel(6)));
    }

    #[test]
    fn test_link_spans_and_interaction() {
        let c = MarkdownClassifier::new();
        let text = "See [Example](https://x.com) now\n";
        let r = c.classify(text);

        assert_eq!(r.links.len(), 1);
        let link = &r.links[0];
        assert_eq!(link.url, "https://x.com");
        assert_eq!(&text[link.text_span.0..link.text_span.1], "Example");
        assert_eq!(&text[link.url_span.0..link.url_span.1], "https://x.com");
        // One shared region covers both the label and the URL
        assert!(link.covers(link.text_span.0));
        assert!(link.covers(link.url_span.0));
        assert!(!link.covers(0));
    }

    #[test]
    fn test_fenced_code_block_spans() {
        let c = MarkdownClassifier::new();
        let text = "```rust\nfn main() {}\n```\n";
        let r = c.classify(text);

        let block = find_span(&r, SpanCategory::CodeBlock).unwrap();
        assert_eq!(block.start, 0);

        let body = find_span(&r, SpanCategory::CodeBody).unwrap();
        assert_eq!(&text[body.start..body.end], "fn main() {}\n");

        let lang = find_span(&r, SpanCategory::CodeLang).unwrap();
        assert_eq!(&text[lang.start..lang.end], "rust");

        // Not a runnable language
        assert!(r.code_runs.is_empty());
    }

    #[test]
    fn test_language_token_is_trimmed() {
        let c = MarkdownClassifier::new();
        let text = "``` py \npass\n```\n";
        let r = c.classify(text);
        let lang = find_span(&r, SpanCategory::CodeLang).unwrap();
        assert_eq!(&text[lang.start..lang.end], "py");
    }

    #[test]
    fn test_python_block_produces_run_interaction() {
        let c = MarkdownClassifier::new();
        let text = "```python\nprint('hi')\n```\n";
        let r = c.classify(text);

        assert_eq!(r.code_runs.len(), 1);
        let run = &r.code_runs[0];
        assert_eq!(run.language, "python");
        assert_eq!(run.index, 0);
        // Clickable area is the language label
        assert_eq!(&text[run.run_span.0..run.run_span.1], "python");
        assert_eq!(&text[run.body_span.0..run.body_span.1], "print('hi')\n");
        // Region ids are distinct within the pass
        assert_ne!(run.block_region_id, run.body_region_id);
        assert_ne!(run.body_region_id, run.run_region_id);
    }

    #[test]
    fn test_empty_lang_python_block_run_covers_body() {
        // No language label: the body itself is the clickable area.
        // An unlabeled block is not runnable, so use "py2" vs none
        let c = MarkdownClassifier::new();
        let text = "```  \ncode\n```\n";
        let r = c.classify(text);
        assert!(r.code_runs.is_empty());
        assert!(find_span(&r, SpanCategory::CodeLang).is_none());
    }

    #[test]
    fn test_code_tokens_emitted_with_lexer() {
        let c = MarkdownClassifier::with_lexer(Box::new(SyntectTokenLexer::new()));
        let text = "```python\ndef f():\n    return 'x'\n```\n";
        let r = c.classify(text);

        let token_spans: Vec<&Span> = r
            .spans
            .iter()
            .filter(|s| matches!(s.category, SpanCategory::CodeToken(_)))
            .collect();
        assert!(!token_spans.is_empty());
        // Token spans stay inside the body
        let body = find_span(&r, SpanCategory::CodeBody).unwrap();
        for s in &token_spans {
            assert!(s.start >= body.start && s.end <= body.end);
        }
        assert!(token_spans
            .iter()
            .any(|s| s.category == SpanCategory::CodeToken(TokenKind::Keyword)));
    }

    #[test]
    fn test_oversized_body_skips_token_lexing() {
        let c = MarkdownClassifier::with_lexer(Box::new(SyntectTokenLexer::new()));
        let big = "x = 1\n".repeat(4000); // > 20k bytes
        let text = format!("```python\n{}```\n", big);
        let r = c.classify(&text);
        assert!(find_span(&r, SpanCategory::CodeBody).is_some());
        assert!(!r
            .spans
            .iter()
            .any(|s| matches!(s.category, SpanCategory::CodeToken(_))));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let c = MarkdownClassifier::new();
        let text = "# T\n\n- item\n\n```python\nprint('x')\n```\n[x](url)\n";
        let first = c.classify(text);
        let second = c.classify(text);
        assert_eq!(first.spans.len(), second.spans.len());
        assert_eq!(first.links.len(), second.links.len());
        assert_eq!(first.code_runs.len(), second.code_runs.len());
        assert_eq!(categories(&first), categories(&second));
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let c = MarkdownClassifier::new();
        let r = c.classify("");
        assert!(r.spans.is_empty());
        assert!(r.links.is_empty());
        assert!(r.code_runs.is_empty());
    }

    #[test]
    fn test_zero_length_spans_are_dropped() {
        let c = MarkdownClassifier::new();
        // Degenerate constructs that could produce empty ranges
        let r = c.classify("****\n[]()\n");
        for s in &r.spans {
            assert!(s.start < s.end);
        }
    }

    #[test]
    fn test_multiple_links_get_distinct_region_ids() {
        let c = MarkdownClassifier::new();
        let r = c.classify("[a](u1) [b](u2)");
        assert_eq!(r.links.len(), 2);
        assert_ne!(r.links[0].region_id, r.links[1].region_id);
    }
}
