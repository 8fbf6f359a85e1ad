use fltk::{
    app::Sender,
    enums::{Color, Font},
    text::StyleTableEntry,
};

use crate::app::domain::messages::Message;
use crate::app::domain::settings::ThemeMode;
use crate::app::domain::span::{
    CodeRunInteraction, LinkInteraction, Span, SpanCategory, TokenKind,
};
use crate::app::services::markdown::{ClassifyResult, CodeTokenLexer, MarkdownClassifier};

/// Owns the classifier, the most recent pass result, and the debounce
/// state that keeps typing responsive. Edits set a pending flag and arm
/// a timer; only the timer callback triggers a real reclassify, so a
/// burst of keystrokes costs one pass.
pub struct HighlightController {
    classifier: MarkdownClassifier,
    result: ClassifyResult,
    pub reclassify_timer_active: bool,
    debounce_secs: f64,
    pub highlighting_enabled: bool,
}

impl HighlightController {
    pub fn new(
        lexer: Option<Box<dyn CodeTokenLexer>>,
        debounce_ms: u64,
        highlighting_enabled: bool,
    ) -> Self {
        let classifier = match lexer {
            Some(l) => MarkdownClassifier::with_lexer(l),
            None => MarkdownClassifier::new(),
        };
        Self {
            classifier,
            result: ClassifyResult::default(),
            reclassify_timer_active: false,
            debounce_secs: debounce_ms as f64 / 1000.0,
            highlighting_enabled,
        }
    }

    /// Arm the debounce timer. Repeat calls while a timer is pending
    /// are free.
    pub fn schedule_reclassify(&mut self, sender: &Sender<Message>) {
        if !self.highlighting_enabled || self.reclassify_timer_active {
            return;
        }
        self.reclassify_timer_active = true;
        let s = *sender;
        fltk::app::add_timeout3(self.debounce_secs, move |_| {
            s.send(Message::Reclassify);
        });
    }

    /// Run a full classification pass and return the flattened style
    /// string for the editor's style buffer. The new pass fully
    /// replaces the previous spans and interactive regions.
    pub fn reclassify(&mut self, text: &str) -> String {
        self.reclassify_timer_active = false;
        if self.highlighting_enabled {
            self.result = self.classifier.classify(text);
        } else {
            self.result = ClassifyResult::default();
        }
        flatten_styles(text.len(), &self.result.spans)
    }

    pub fn result(&self) -> &ClassifyResult {
        &self.result
    }

    /// Link region under a byte position, if any.
    pub fn link_at(&self, pos: usize) -> Option<&LinkInteraction> {
        self.result.links.iter().find(|l| l.covers(pos))
    }

    /// Code-run region under a byte position, if any.
    pub fn code_run_at(&self, pos: usize) -> Option<&CodeRunInteraction> {
        self.result.code_runs.iter().find(|r| r.covers(pos))
    }

    pub fn clear(&mut self) {
        self.result = ClassifyResult::default();
    }
}

/// Flatten overlapping spans into FLTK's one-style-char-per-byte
/// string. Spans are painted in precedence order so that, for example,
/// a list marker keeps its color inside the list-item wash and code
/// tokens win over the code-body background style.
pub fn flatten_styles(text_len: usize, spans: &[Span]) -> String {
    let mut chars = vec![b'A'; text_len];
    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by_key(|s| paint_rank(s.category));
    for span in ordered {
        let Some(ch) = style_char(span.category) else {
            continue;
        };
        let end = span.end.min(text_len);
        for byte in &mut chars[span.start.min(end)..end] {
            *byte = ch as u8;
        }
    }
    // Style chars never exceed one byte, the string stays ASCII
    String::from_utf8(chars).unwrap_or_default()
}

/// Lower ranks paint first and get overwritten by higher ones.
fn paint_rank(category: SpanCategory) -> u8 {
    match category {
        SpanCategory::ListItem => 0,
        SpanCategory::ListLevel(_) => 0,
        SpanCategory::Blockquote => 1,
        SpanCategory::Heading(_) => 2,
        SpanCategory::Bold | SpanCategory::Italic => 3,
        SpanCategory::HeadingItalic(_) => 4,
        SpanCategory::BoldItalic => 5,
        SpanCategory::Strikethrough => 6,
        SpanCategory::LinkText | SpanCategory::LinkUrl => 7,
        SpanCategory::UnorderedMarker | SpanCategory::OrderedMarker => 8,
        SpanCategory::CodeBlock => 9,
        SpanCategory::CodeBody => 10,
        SpanCategory::CodeLang => 11,
        SpanCategory::CodeToken(_) => 12,
        SpanCategory::InlineCode => 13,
    }
}

/// Fixed category-to-style-char table. Must stay in step with the
/// entry order in [`style_table`]; index = char - 'A'.
fn style_char(category: SpanCategory) -> Option<char> {
    let index: u8 = match category {
        SpanCategory::Heading(level) => level.clamp(1, 6),           // 1..=6
        SpanCategory::HeadingItalic(level) => 6 + level.clamp(1, 6), // 7..=12
        SpanCategory::Bold => 13,
        SpanCategory::Italic => 14,
        SpanCategory::BoldItalic => 15,
        SpanCategory::Strikethrough => 16,
        SpanCategory::InlineCode => 17,
        SpanCategory::CodeBlock => 18,
        SpanCategory::CodeBody => 19,
        SpanCategory::CodeLang => 20,
        SpanCategory::Blockquote => 21,
        SpanCategory::ListItem => 22,
        SpanCategory::UnorderedMarker => 23,
        SpanCategory::OrderedMarker => 24,
        SpanCategory::LinkText => 25,
        SpanCategory::LinkUrl => 26,
        SpanCategory::CodeToken(kind) => 27 + token_index(kind),
        // Layout hint only, never painted
        SpanCategory::ListLevel(_) => return None,
    };
    Some((b'A' + index) as char)
}

fn token_index(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Keyword => 0,
        TokenKind::Name => 1,
        TokenKind::Builtin => 2,
        TokenKind::Str => 3,
        TokenKind::Number => 4,
        TokenKind::Comment => 5,
        TokenKind::Operator => 6,
        TokenKind::Punctuation => 7,
        TokenKind::Function => 8,
        TokenKind::Class => 9,
        TokenKind::Decorator => 10,
    }
}

/// Full style table for `set_highlight_data`, in the index order
/// [`style_char`] assigns. Headings scale the font size by level.
pub fn style_table(theme: ThemeMode, font_size: i32) -> Vec<StyleTableEntry> {
    let p = Palette::for_theme(theme);
    let plain = Font::Helvetica;
    let mono = Font::Courier;
    let entry = |color: Color, font: Font, size: i32| StyleTableEntry { color, font, size };
    let heading_size = |level: i32| font_size + (7 - level).max(1) * 2;

    let mut table = Vec::with_capacity(38);
    // 'A': plain text
    table.push(entry(p.text, plain, font_size));
    for level in 1..=6 {
        table.push(entry(p.heading, Font::HelveticaBold, heading_size(level)));
    }
    for level in 1..=6 {
        table.push(entry(
            p.heading,
            Font::HelveticaBoldItalic,
            heading_size(level),
        ));
    }
    table.push(entry(p.text, Font::HelveticaBold, font_size)); // bold
    table.push(entry(p.text, Font::HelveticaItalic, font_size)); // italic
    table.push(entry(p.text, Font::HelveticaBoldItalic, font_size)); // bold italic
    table.push(entry(p.muted, plain, font_size)); // strikethrough
    table.push(entry(p.code, mono, font_size)); // inline code
    table.push(entry(p.muted, mono, font_size)); // code block fences
    table.push(entry(p.code, mono, font_size)); // code body
    table.push(entry(p.accent, mono, font_size)); // code language label
    table.push(entry(p.muted, Font::HelveticaItalic, font_size)); // blockquote
    table.push(entry(p.text, plain, font_size)); // list item
    table.push(entry(p.accent, Font::HelveticaBold, font_size)); // unordered marker
    table.push(entry(p.accent, Font::HelveticaBold, font_size)); // ordered marker
    table.push(entry(p.link, plain, font_size)); // link text
    table.push(entry(p.muted, plain, font_size)); // link url
    // Code tokens, in TokenKind index order
    table.push(entry(p.keyword, mono, font_size));
    table.push(entry(p.code, mono, font_size));
    table.push(entry(p.builtin, mono, font_size));
    table.push(entry(p.string, mono, font_size));
    table.push(entry(p.number, mono, font_size));
    table.push(entry(p.comment, mono, font_size));
    table.push(entry(p.text, mono, font_size));
    table.push(entry(p.muted, mono, font_size));
    table.push(entry(p.function, mono, font_size));
    table.push(entry(p.class, mono, font_size));
    table.push(entry(p.decorator, mono, font_size));
    table
}

struct Palette {
    text: Color,
    muted: Color,
    heading: Color,
    accent: Color,
    link: Color,
    code: Color,
    keyword: Color,
    builtin: Color,
    string: Color,
    number: Color,
    comment: Color,
    function: Color,
    class: Color,
    decorator: Color,
}

impl Palette {
    fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self {
                text: Color::from_rgb(0xdc, 0xdc, 0xdc),
                muted: Color::from_rgb(0x80, 0x80, 0x80),
                heading: Color::from_rgb(0x6f, 0xb3, 0xe0),
                accent: Color::from_rgb(0xd7, 0xa6, 0x5f),
                link: Color::from_rgb(0x6c, 0x95, 0xeb),
                code: Color::from_rgb(0xc8, 0xc8, 0xb0),
                keyword: Color::from_rgb(0xc5, 0x86, 0xc0),
                builtin: Color::from_rgb(0x4e, 0xc9, 0xb0),
                string: Color::from_rgb(0xce, 0x91, 0x78),
                number: Color::from_rgb(0xb5, 0xce, 0xa8),
                comment: Color::from_rgb(0x6a, 0x99, 0x55),
                function: Color::from_rgb(0xdc, 0xdc, 0xaa),
                class: Color::from_rgb(0x4e, 0xc9, 0xb0),
                decorator: Color::from_rgb(0xd7, 0xba, 0x7d),
            },
            ThemeMode::Light => Self {
                text: Color::from_rgb(0x20, 0x20, 0x20),
                muted: Color::from_rgb(0x70, 0x70, 0x70),
                heading: Color::from_rgb(0x1a, 0x5f, 0x9e),
                accent: Color::from_rgb(0xa0, 0x6a, 0x00),
                link: Color::from_rgb(0x0b, 0x5b, 0xd3),
                code: Color::from_rgb(0x44, 0x44, 0x33),
                keyword: Color::from_rgb(0x77, 0x00, 0x88),
                builtin: Color::from_rgb(0x00, 0x70, 0x80),
                string: Color::from_rgb(0xa3, 0x15, 0x15),
                number: Color::from_rgb(0x09, 0x66, 0x09),
                comment: Color::from_rgb(0x40, 0x80, 0x40),
                function: Color::from_rgb(0x79, 0x5e, 0x26),
                class: Color::from_rgb(0x26, 0x7f, 0x99),
                decorator: Color::from_rgb(0x80, 0x60, 0x00),
            },
        }
    }
}
