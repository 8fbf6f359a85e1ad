use regex_lite::Regex;

/// Auto-extends unordered and ordered lists when pressing Enter.
///
/// Detects the current line's list marker: unordered (`-`, `*`, `+`)
/// repeats the bullet, ordered (`1.`) increments the number. A line
/// holding only a marker breaks the list instead (like most editors).
pub struct ListEdit {
    re_ul: Regex,
    re_ol: Regex,
}

/// What Enter should do on a given list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListContinuation {
    /// Not a list line; let the editor insert a plain newline.
    NotAList,
    /// Marker-only line: replace the line with its bare indent.
    BreakList { indent: String },
    /// Insert this text (newline included) at the caret.
    Continue { insert: String },
}

impl Default for ListEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl ListEdit {
    pub fn new() -> Self {
        Self {
            re_ul: Regex::new(r"^([\t ]*)([-*+])[\t ]+(.*)$").unwrap(),
            re_ol: Regex::new(r"^([\t ]*)(\d+)\.[\t ]+(.*)$").unwrap(),
        }
    }

    /// Decide how Enter continues the list on `line`.
    pub fn continuation(&self, line: &str) -> ListContinuation {
        if let Some(caps) = self.re_ul.captures(line) {
            let indent = caps.get(1).map_or("", |m| m.as_str());
            let marker = caps.get(2).map_or("", |m| m.as_str());
            let rest = caps.get(3).map_or("", |m| m.as_str()).trim_end();
            if rest.is_empty() {
                return ListContinuation::BreakList {
                    indent: indent.to_string(),
                };
            }
            return ListContinuation::Continue {
                insert: format!("\n{}{} ", indent, marker),
            };
        }
        if let Some(caps) = self.re_ol.captures(line) {
            let indent = caps.get(1).map_or("", |m| m.as_str());
            let rest = caps.get(3).map_or("", |m| m.as_str()).trim_end();
            if rest.is_empty() {
                return ListContinuation::BreakList {
                    indent: indent.to_string(),
                };
            }
            // Numbers that cannot grow any further get a plain newline
            let next = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .and_then(|n| n.checked_add(1));
            return match next {
                Some(n) => ListContinuation::Continue {
                    insert: format!("\n{}{}. ", indent, n),
                },
                None => ListContinuation::NotAList,
            };
        }
        ListContinuation::NotAList
    }

    /// Renumber the contiguous ordered-list block around `line_index`
    /// (zero-based) at that line's indentation width. The first item of
    /// the block keeps its number; following items run sequentially.
    ///
    /// Returns `(line_index, replacement_line)` pairs for the lines that
    /// actually change, so the caller can patch the buffer line by line.
    pub fn renumber_ordered_block(&self, text: &str, line_index: usize) -> Vec<(usize, String)> {
        let lines: Vec<&str> = text.split('\n').collect();
        let Some(line) = lines.get(line_index) else {
            return Vec::new();
        };
        let Some(width) = self.ordered_indent_width(line) else {
            return Vec::new();
        };

        // Scan upwards to the start of the same-width block
        let mut start = line_index;
        while start > 0 {
            match self.ordered_indent_width(lines[start - 1]) {
                Some(w) if w == width => start -= 1,
                _ => break,
            }
        }

        let Some(first_caps) = self.re_ol.captures(lines[start]) else {
            return Vec::new();
        };
        // A first number the counter cannot represent leaves the block alone
        let Some(mut current) = first_caps
            .get(2)
            .and_then(|m| m.as_str().parse::<i64>().ok())
        else {
            return Vec::new();
        };

        // Scan downward, renumbering subsequent same-width items
        let mut edits = Vec::new();
        let mut ln = start + 1;
        while ln < lines.len() {
            match self.ordered_indent_width(lines[ln]) {
                Some(w) if w == width => {}
                _ => break,
            }
            let caps = match self.re_ol.captures(lines[ln]) {
                Some(c) => c,
                None => break,
            };
            current = match current.checked_add(1) {
                Some(n) => n,
                None => break,
            };
            let old_num = caps.get(2).map_or("", |m| m.as_str());
            if old_num != current.to_string() {
                let indent = caps.get(1).map_or("", |m| m.as_str());
                let tail = &lines[ln][indent.len() + old_num.len() + 1..];
                edits.push((ln, format!("{}{}.{}", indent, current, tail)));
            }
            ln += 1;
        }
        edits
    }

    /// Indentation width of an ordered item, tabs counted as 4 columns.
    /// `None` when the line is not an ordered list item.
    fn ordered_indent_width(&self, line: &str) -> Option<usize> {
        let caps = self.re_ol.captures(line)?;
        let indent = caps.get(1).map_or("", |m| m.as_str());
        Some(
            indent
                .chars()
                .map(|c| if c == '\t' { 4 } else { 1 })
                .sum(),
        )
    }
}
