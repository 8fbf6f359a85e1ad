use regex_lite::Regex;

/// Precompiled pattern set for the markdown classifier.
///
/// Regex-based by design: this is a line-oriented approximation tuned
/// for responsiveness, not a CommonMark parser. Each pattern is scanned
/// independently over the full text; overlap between categories is
/// resolved afterwards by the classifier.
pub struct MarkdownPatterns {
    /// `# Heading` .. `###### Heading`; group 1 = hashes, group 2 = text.
    pub heading: Regex,
    /// `***x***` (group 1) or `___x___` (group 2). Alternation instead of
    /// a backreference, which regex-lite does not support.
    pub bold_italic: Regex,
    /// `**x**` (group 1) or `__x__` (group 2).
    pub bold: Regex,
    /// `*x*` (group 1) or `_x_` (group 2). Adjacent-delimiter rejection
    /// (so `**bold**` is not italic) happens in the classifier since the
    /// lookaround the original used is unavailable here.
    pub italic: Regex,
    /// `~~x~~`; group 1 = text.
    pub strike: Regex,
    /// `` `x` ``; group 1 = text.
    pub inline_code: Regex,
    /// ```` ```lang\nbody``` ````; group 1 = lang (untrimmed), group 2 = body.
    pub fenced_code: Regex,
    /// Lines starting with `>`.
    pub blockquote: Regex,
    /// Unordered item; groups: 1 = indent, 2 = marker, 3 = text.
    pub ul_item: Regex,
    /// Ordered item; groups: 1 = indent, 2 = number, 3 = text.
    pub ol_item: Regex,
    /// `[text](url)`; group 1 = text, group 2 = url.
    pub link: Regex,
}

impl Default for MarkdownPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownPatterns {
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"(?m)^(#{1,6})[\t ]+(.+)$").unwrap(),
            bold_italic: Regex::new(r"\*\*\*([^\n]+?)\*\*\*|___([^\n]+?)___").unwrap(),
            bold: Regex::new(r"\*\*([^\n]+?)\*\*|__([^\n]+?)__").unwrap(),
            italic: Regex::new(r"\*([^\n*]+?)\*|_([^\n_]+?)_").unwrap(),
            strike: Regex::new(r"~~([^\n]+?)~~").unwrap(),
            inline_code: Regex::new(r"`([^`\n]+?)`").unwrap(),
            fenced_code: Regex::new(r"(?ms)^```([^\n`]*)\n(.*?)^```").unwrap(),
            blockquote: Regex::new(r"(?m)^>[\t ]?.*$").unwrap(),
            ul_item: Regex::new(r"(?m)^([\t ]*)([-*+])[\t ]+(.+)$").unwrap(),
            ol_item: Regex::new(r"(?m)^([\t ]*)(\d+)\.[\t ]+(.+)$").unwrap(),
            link: Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").unwrap(),
        }
    }
}
