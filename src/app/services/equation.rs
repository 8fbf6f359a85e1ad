/// Safe arithmetic evaluator for the "type `=` and get the answer" feature.
///
/// The grammar is deliberately tiny: numeric literals, parentheses,
/// unary +/-, and the binary operators `+ - * / % **`. Everything else
/// (names, calls, comparisons) fails the parse and yields `None`; the
/// caller must not touch the buffer on `None`.
const MAX_EXPR_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    LParen,
    RParen,
}

/// Evaluate an arithmetic expression, or `None` on any parse or
/// evaluation error (division by zero, overflow to non-finite, ...).
pub fn evaluate(expression: &str) -> Option<Number> {
    let expression = expression.trim();
    if expression.is_empty() || expression.len() > MAX_EXPR_LEN {
        return None;
    }
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return None; // trailing garbage
    }
    match value {
        Number::Float(f) if !f.is_finite() => None,
        v => Some(v),
    }
}

/// Render a result the way it is inserted after `=`: integers as plain
/// decimal, floats to 6 decimal places with trailing zeros and a
/// dangling decimal point stripped.
pub fn format_result(value: Number) -> Option<String> {
    match value {
        Number::Int(i) => Some(i.to_string()),
        Number::Float(f) => {
            if !f.is_finite() {
                return None;
            }
            let mut s = format!("{:.6}", f);
            if s.contains('.') {
                s = s.trim_end_matches('0').trim_end_matches('.').to_string();
            }
            Some(s)
        }
    }
}

/// The `=` keystroke contract: take the text of the current line up to
/// and including the `=` just typed, evaluate what precedes the last
/// `=`, and return the formatted result to insert after it.
/// `^` is accepted as a power operator.
pub fn autocomplete_equals(line_prefix: &str) -> Option<String> {
    let (expr, _) = line_prefix.rsplit_once('=')?;
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }
    let translated = expr.replace('^', "**");
    let value = evaluate(&translated)?;
    format_result(value)
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' => i += 1,
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(Token::Pow);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                let mut seen_dot = false;
                while i < bytes.len() {
                    match bytes[i] {
                        b'0'..=b'9' => i += 1,
                        b'.' if !seen_dot => {
                            seen_dot = true;
                            i += 1;
                        }
                        _ => break,
                    }
                }
                let lit = &expr[start..i];
                if lit == "." {
                    return None;
                }
                if seen_dot {
                    tokens.push(Token::Float(lit.parse().ok()?));
                } else {
                    match lit.parse::<i64>() {
                        Ok(n) => tokens.push(Token::Int(n)),
                        // Too many digits for i64: carry as float
                        Err(_) => tokens.push(Token::Float(lit.parse().ok()?)),
                    }
                }
            }
            // Names, commas, comparisons and anything else: rejected grammar
            _ => return None,
        }
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.peek()?;
        self.pos += 1;
        Some(t)
    }

    // expr := term { (+|-) term }
    fn parse_expr(&mut self) -> Option<Number> {
        let mut acc = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc = add(acc, self.parse_term()?)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc = sub(acc, self.parse_term()?)?;
                }
                _ => return Some(acc),
            }
        }
    }

    // term := factor { (*|/|%) factor }
    fn parse_term(&mut self) -> Option<Number> {
        let mut acc = self.parse_factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc = mul(acc, self.parse_factor()?)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    acc = div(acc, self.parse_factor()?)?;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    acc = rem(acc, self.parse_factor()?)?;
                }
                _ => return Some(acc),
            }
        }
    }

    // factor := (+|-) factor | power
    // Unary minus binds looser than ** on its left: -2**2 == -(2**2).
    fn parse_factor(&mut self) -> Option<Number> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_factor()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Some(neg(self.parse_factor()?))
            }
            _ => self.parse_power(),
        }
    }

    // power := primary [ ** factor ]   (right-associative)
    fn parse_power(&mut self) -> Option<Number> {
        let base = self.parse_primary()?;
        if self.peek() == Some(Token::Pow) {
            self.pos += 1;
            let exp = self.parse_factor()?;
            return pow(base, exp);
        }
        Some(base)
    }

    fn parse_primary(&mut self) -> Option<Number> {
        match self.bump()? {
            Token::Int(n) => Some(Number::Int(n)),
            Token::Float(f) => Some(Number::Float(f)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                match self.bump()? {
                    Token::RParen => Some(inner),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn as_f64(n: Number) -> f64 {
    match n {
        Number::Int(i) => i as f64,
        Number::Float(f) => f,
    }
}

fn neg(n: Number) -> Number {
    match n {
        Number::Int(i) => i.checked_neg().map_or(Number::Float(-(i as f64)), Number::Int),
        Number::Float(f) => Number::Float(-f),
    }
}

fn add(a: Number, b: Number) -> Option<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(
            x.checked_add(y)
                .map_or(Number::Float(x as f64 + y as f64), Number::Int),
        ),
        _ => Some(Number::Float(as_f64(a) + as_f64(b))),
    }
}

fn sub(a: Number, b: Number) -> Option<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(
            x.checked_sub(y)
                .map_or(Number::Float(x as f64 - y as f64), Number::Int),
        ),
        _ => Some(Number::Float(as_f64(a) - as_f64(b))),
    }
}

fn mul(a: Number, b: Number) -> Option<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(
            x.checked_mul(y)
                .map_or(Number::Float(x as f64 * y as f64), Number::Int),
        ),
        _ => Some(Number::Float(as_f64(a) * as_f64(b))),
    }
}

/// Division always produces a float; dividing by zero is an error,
/// not infinity.
fn div(a: Number, b: Number) -> Option<Number> {
    let divisor = as_f64(b);
    if divisor == 0.0 {
        return None;
    }
    Some(Number::Float(as_f64(a) / divisor))
}

/// Remainder with the sign of the divisor (floored modulo).
fn rem(a: Number, b: Number) -> Option<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let r = x.checked_rem(y)?;
            // Flip into the divisor's sign when the truncated remainder disagrees
            let m = if r != 0 && (r < 0) != (y < 0) { r + y } else { r };
            Some(Number::Int(m))
        }
        _ => {
            let (x, y) = (as_f64(a), as_f64(b));
            if y == 0.0 {
                return None;
            }
            Some(Number::Float(x - y * (x / y).floor()))
        }
    }
}

fn pow(base: Number, exp: Number) -> Option<Number> {
    match (base, exp) {
        (Number::Int(b), Number::Int(e)) if e >= 0 => {
            let e32 = u32::try_from(e).ok()?;
            match b.checked_pow(e32) {
                Some(v) => Some(Number::Int(v)),
                None => Some(Number::Float((b as f64).powf(e as f64))),
            }
        }
        _ => Some(Number::Float(as_f64(base).powf(as_f64(exp)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(expr: &str) -> Option<String> {
        evaluate(expr).and_then(format_result)
    }

    #[test]
    fn test_precedence_and_basic_arithmetic() {
        assert_eq!(eval_str("3+4*2"), Some("11".to_string()));
        assert_eq!(eval_str("(3+4)*2"), Some("14".to_string()));
        assert_eq!(eval_str("10-2-3"), Some("5".to_string()));
        assert_eq!(eval_str("2*3*4"), Some("24".to_string()));
    }

    #[test]
    fn test_power() {
        assert_eq!(eval_str("2**3"), Some("8".to_string()));
        // Right-associative: 2**(3**2)
        assert_eq!(eval_str("2**3**2"), Some("512".to_string()));
        // Unary minus binds looser than ** on the left
        assert_eq!(eval_str("-2**2"), Some("-4".to_string()));
        assert_eq!(eval_str("2**-1"), Some("0.5".to_string()));
    }

    #[test]
    fn test_division_is_float() {
        assert_eq!(eval_str("4/2"), Some("2".to_string()));
        assert_eq!(eval_str("1/3"), Some("0.333333".to_string()));
        assert_eq!(eval_str("7/2"), Some("3.5".to_string()));
    }

    #[test]
    fn test_division_by_zero_rejected() {
        assert_eq!(evaluate("1/0"), None);
        assert_eq!(evaluate("1.0/0.0"), None);
        assert_eq!(evaluate("5%0"), None);
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(eval_str("7%3"), Some("1".to_string()));
        assert_eq!(eval_str("-7%3"), Some("2".to_string()));
        assert_eq!(eval_str("7%-3"), Some("-2".to_string()));
        assert_eq!(eval_str("7.5%2"), Some("1.5".to_string()));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval_str("-5+3"), Some("-2".to_string()));
        assert_eq!(eval_str("+5"), Some("5".to_string()));
        assert_eq!(eval_str("--5"), Some("5".to_string()));
        assert_eq!(eval_str("-(2+3)"), Some("-5".to_string()));
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(eval_str("2.5+2.5"), Some("5".to_string()));
        assert_eq!(eval_str("0.1+0.2"), Some("0.3".to_string()));
        assert_eq!(eval_str("1.123456789*1"), Some("1.123457".to_string()));
    }

    #[test]
    fn test_rejected_grammar() {
        assert_eq!(evaluate("import os"), None);
        assert_eq!(evaluate("a+1"), None);
        assert_eq!(evaluate("1 < 2"), None);
        assert_eq!(evaluate("max(1,2)"), None);
        assert_eq!(evaluate(""), None);
        assert_eq!(evaluate("1+"), None);
        assert_eq!(evaluate("(1+2"), None);
        assert_eq!(evaluate("1 2"), None);
        assert_eq!(evaluate("."), None);
    }

    #[test]
    fn test_length_cap() {
        let long = "1+".repeat(101) + "1";
        assert_eq!(evaluate(&long), None);
        // Just under the cap still evaluates
        assert_eq!(eval_str("1+1"), Some("2".to_string()));
    }

    #[test]
    fn test_overflow_promotes_to_float_or_rejects() {
        // i64 overflow falls back to float arithmetic
        assert!(evaluate("9223372036854775807+1").is_some());
        // Non-finite results are rejected
        assert_eq!(evaluate("10.0**400**2"), None);
    }

    #[test]
    fn test_autocomplete_equals() {
        assert_eq!(autocomplete_equals("3+4="), Some("7".to_string()));
        assert_eq!(autocomplete_equals("2^3="), Some("8".to_string()));
        assert_eq!(autocomplete_equals("price: 3*7="), None); // name before expr
        assert_eq!(autocomplete_equals("x = 1+1="), None);
        assert_eq!(autocomplete_equals("="), None);
        assert_eq!(autocomplete_equals("no equals"), None);
        // Everything before the *last* equals is the expression; an
        // earlier '=' makes it invalid
        assert_eq!(autocomplete_equals("1+1=2, 2+2="), None);
    }
}
