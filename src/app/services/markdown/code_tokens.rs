use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};

use crate::app::domain::span::TokenKind;

/// A categorized fragment of a code-block body: byte range relative to
/// the body start, plus the token category it maps to.
pub type TokenFragment = (usize, usize, TokenKind);

/// Optional token-lexing capability for fenced code blocks.
///
/// `tokens` returns `None` when the source cannot be lexed (unknown
/// language, internal failure); the classifier then simply emits no
/// token spans. Implementations must never panic on any input.
pub trait CodeTokenLexer {
    fn tokens(&self, source: &str, lang_hint: Option<&str>) -> Option<Vec<TokenFragment>>;
}

/// Bound on the first-line sample handed to syntax guessing.
const GUESS_SAMPLE_BYTES: usize = 4000;

/// Token lexer backed by syntect's default syntax definitions.
pub struct SyntectTokenLexer {
    syntax_set: SyntaxSet,
}

impl Default for SyntectTokenLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectTokenLexer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    fn find_syntax(&self, source: &str, lang_hint: Option<&str>) -> Option<&syntect::parsing::SyntaxReference> {
        if let Some(hint) = lang_hint {
            let hint = hint.trim();
            if !hint.is_empty() {
                if let Some(syntax) = self.syntax_set.find_syntax_by_token(hint) {
                    return Some(syntax);
                }
            }
        }
        // Best-effort guess from the first line, bounded for responsiveness
        let mut end = GUESS_SAMPLE_BYTES.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let first_line = source[..end].lines().next()?;
        self.syntax_set.find_syntax_by_first_line(first_line)
    }
}

impl CodeTokenLexer for SyntectTokenLexer {
    fn tokens(&self, source: &str, lang_hint: Option<&str>) -> Option<Vec<TokenFragment>> {
        let syntax = self.find_syntax(source, lang_hint)?;
        let mut parse_state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut fragments = Vec::new();
        let mut line_offset = 0;

        for line in source.split_inclusive('\n') {
            let ops = parse_state.parse_line(line, &self.syntax_set).ok()?;
            let mut last = 0;
            for (pos, op) in ops {
                push_fragment(&mut fragments, line, line_offset, last, pos, &stack);
                stack.apply(&op).ok()?;
                last = pos;
            }
            push_fragment(&mut fragments, line, line_offset, last, line.len(), &stack);
            line_offset += line.len();
        }

        Some(fragments)
    }
}

fn push_fragment(
    fragments: &mut Vec<TokenFragment>,
    line: &str,
    line_offset: usize,
    start: usize,
    end: usize,
    stack: &ScopeStack,
) {
    if start >= end {
        return;
    }
    // Skip pure whitespace to reduce span churn
    if line[start..end].chars().all(char::is_whitespace) {
        return;
    }
    if let Some(kind) = kind_for(stack) {
        fragments.push((line_offset + start, line_offset + end, kind));
    }
}

/// Map the innermost recognizable scope to a token category.
fn kind_for(stack: &ScopeStack) -> Option<TokenKind> {
    for scope in stack.as_slice().iter().rev() {
        let name = scope.build_string();
        if let Some(kind) = kind_for_scope(&name) {
            return Some(kind);
        }
    }
    None
}

fn kind_for_scope(name: &str) -> Option<TokenKind> {
    // More specific prefixes first
    if name.starts_with("comment") {
        Some(TokenKind::Comment)
    } else if name.starts_with("string") {
        Some(TokenKind::Str)
    } else if name.starts_with("constant.numeric") {
        Some(TokenKind::Number)
    } else if name.starts_with("entity.name.function.decorator")
        || name.starts_with("variable.annotation")
        || name.starts_with("punctuation.definition.annotation")
    {
        Some(TokenKind::Decorator)
    } else if name.starts_with("entity.name.function") || name.starts_with("variable.function") {
        Some(TokenKind::Function)
    } else if name.starts_with("entity.name.class") || name.starts_with("entity.name.type") {
        Some(TokenKind::Class)
    } else if name.starts_with("support.function")
        || name.starts_with("support.type")
        || name.starts_with("support.class")
        || name.starts_with("constant.language")
    {
        Some(TokenKind::Builtin)
    } else if name.starts_with("keyword.operator") {
        Some(TokenKind::Operator)
    } else if name.starts_with("keyword") || name.starts_with("storage") {
        Some(TokenKind::Keyword)
    } else if name.starts_with("punctuation") {
        Some(TokenKind::Punctuation)
    } else if name.starts_with("variable") || name.starts_with("entity.name") {
        Some(TokenKind::Name)
    } else {
        None
    }
}
