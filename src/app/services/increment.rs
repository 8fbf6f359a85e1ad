use regex_lite::Regex;

/// Cardinal vocabulary, index = value ("zero".."twenty").
const CARDINALS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Ordinal vocabulary, index = value ("zeroth".."twentieth").
const ORDINALS: [&str; 21] = [
    "zeroth",
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
];

/// Detects and increments numbers in text, including textual forms.
///
/// - Increments Arabic numerals (e.g., 1, 23)
/// - Increments ordinal suffix numerals (e.g., 1st, 2nd, 3rd, 4th)
/// - Increments textual ordinals (e.g., first -> second)
/// - Increments textual cardinals (e.g., one -> two) unless ordinal_only
pub struct TextNumberIncrementer {
    re_number: Regex,
    re_ordinal_words: Regex,
    re_cardinal_words: Regex,
}

impl Default for TextNumberIncrementer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNumberIncrementer {
    pub fn new() -> Self {
        Self {
            re_number: Regex::new(r"(?i)\b(\d+)(st|nd|rd|th)?\b").unwrap(),
            re_ordinal_words: word_alternation(&ORDINALS),
            re_cardinal_words: word_alternation(&CARDINALS),
        }
    }

    pub fn increment(&self, text: &str, ordinal_only: bool, increment_text: bool) -> String {
        // Increment numeric forms first
        let mut out = self.increment_numeric(text);
        // Then increment textual forms
        if increment_text {
            out = self.increment_textual(&out, ordinal_only);
        }
        out
    }

    fn increment_numeric(&self, text: &str) -> String {
        replace_matches(&self.re_number, text, |caps: &regex_lite::Captures| {
            let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            // Absurdly long digit runs, and i64::MAX itself, stay as-is
            let Some(new_num) = digits
                .parse::<i64>()
                .ok()
                .and_then(|n| n.checked_add(1))
            else {
                return whole.to_string();
            };
            if caps.get(2).is_some() {
                format!("{}{}", new_num, ordinal_suffix(new_num))
            } else {
                new_num.to_string()
            }
        })
    }

    /// Single-pass word replacement against the *original* string, so a
    /// substitution never cascades (first -> second -> third).
    fn increment_textual(&self, text: &str, ordinal_only: bool) -> String {
        let out = replace_matches(&self.re_ordinal_words, text, |caps| {
            let word = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            match word_value(&ORDINALS, word).and_then(|v| ORDINALS.get(v + 1)) {
                Some(next) => case_like(word, next),
                // Successor outside the vocabulary: leave the word alone
                None => word.to_string(),
            }
        });

        if ordinal_only {
            return out;
        }

        replace_matches(&self.re_cardinal_words, &out, |caps| {
            let word = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            match word_value(&CARDINALS, word).and_then(|v| CARDINALS.get(v + 1)) {
                Some(next) => case_like(word, next),
                None => word.to_string(),
            }
        })
    }
}

/// Whole-word, case-insensitive alternation over a vocabulary,
/// longest-first so "seventeen" wins over "seven".
fn word_alternation(words: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let pattern = format!(r"(?i)\b({})\b", sorted.join("|"));
    Regex::new(&pattern).unwrap()
}

/// Replace every non-overlapping match using `repl`, locating all matches
/// against the input rather than re-scanning replaced output.
fn replace_matches<F>(re: &Regex, text: &str, mut repl: F) -> String
where
    F: FnMut(&regex_lite::Captures) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let m = caps.get(0).unwrap();
        out.push_str(&text[last..m.start()]);
        out.push_str(&repl(&caps));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn word_value(vocab: &[&str], word: &str) -> Option<usize> {
    let lower = word.to_lowercase();
    vocab.iter().position(|w| *w == lower)
}

/// English ordinal suffix: 11-13 take "th", otherwise by last digit.
fn ordinal_suffix(n: i64) -> &'static str {
    let n_abs = n.abs();
    if (10..=20).contains(&(n_abs % 100)) {
        return "th";
    }
    match n_abs % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Copy the case pattern of `sample` onto `replacement`:
/// ALL-CAPS stays ALL-CAPS, Capitalized stays Capitalized, else lowercase.
fn case_like(sample: &str, replacement: &str) -> String {
    if !sample.is_empty() && sample.chars().all(|c| !c.is_lowercase()) {
        return replacement.to_uppercase();
    }
    if sample.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}
