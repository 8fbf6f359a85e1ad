/// Syntax-token subcategories emitted inside fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Name,
    Builtin,
    Str,
    Number,
    Comment,
    Operator,
    Punctuation,
    Function,
    Class,
    Decorator,
}

/// Closed set of styling categories the classifier can assign.
///
/// Several categories may cover the same text: a character inside
/// `# *title*` carries both `Heading(1)` and `Italic`, plus the
/// composite `HeadingItalic(1)` for the intersection. Spans are kept
/// as independent overlapping records, not one tag per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanCategory {
    /// Heading text (hashes excluded), level 1-6.
    Heading(u8),
    /// Intersection of a heading span and an italic span.
    HeadingItalic(u8),
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    InlineCode,
    /// Whole fenced block including the fences.
    CodeBlock,
    /// Code between the fences.
    CodeBody,
    /// Trimmed language token after the opening fence.
    CodeLang,
    Blockquote,
    /// Whole list-item line.
    ListItem,
    /// Nesting level 0-6 inferred from indentation.
    ListLevel(u8),
    UnorderedMarker,
    /// Numeral plus its trailing period.
    OrderedMarker,
    LinkText,
    LinkUrl,
    CodeToken(TokenKind),
}

/// One classified region: byte offsets into the UTF-8 buffer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub category: SpanCategory,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(category: SpanCategory, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { category, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// A clickable link found during one classification pass.
///
/// Both the label and the URL text share one region id, so a click on
/// either opens the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInteraction {
    pub url: String,
    pub region_id: usize,
    /// Byte range of the `[text]` label (brackets excluded).
    pub text_span: (usize, usize),
    /// Byte range of the `(url)` part (parens excluded).
    pub url_span: (usize, usize),
}

impl LinkInteraction {
    pub fn covers(&self, pos: usize) -> bool {
        let (ts, te) = self.text_span;
        let (us, ue) = self.url_span;
        (ts <= pos && pos < te) || (us <= pos && pos < ue)
    }
}

/// A runnable fenced code block found during one classification pass.
///
/// Region ids are assigned monotonically within the pass; `index` is
/// the zero-based position of the block among all fenced blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRunInteraction {
    pub language: String,
    pub block_region_id: usize,
    pub body_region_id: usize,
    pub run_region_id: usize,
    pub index: usize,
    /// Byte range of the whole block including fences.
    pub block_span: (usize, usize),
    /// Byte range of the code between the fences.
    pub body_span: (usize, usize),
    /// Clickable byte range: the language label when present, else the body.
    pub run_span: (usize, usize),
}

impl CodeRunInteraction {
    pub fn covers(&self, pos: usize) -> bool {
        let (s, e) = self.run_span;
        s <= pos && pos < e
    }
}
