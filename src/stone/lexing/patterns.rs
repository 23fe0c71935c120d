//! The combined token pattern and the per-line scanner built on it.
//!
//!     One regex holds every token alternative, tried in order after optional leading
//!     whitespace:
//!
//!         1. line comment     //...            (dropped)
//!         2. integer literal  [0-9]+
//!         3. string literal   "..." with \" \\ \n escapes
//!         4. identifier       [A-Za-z_][A-Za-z0-9_]*
//!         5. operator         == <= >= && || or one ASCII punctuation character
//!
//!     The backtick is not part of the punctuation class, it is reserved and a line
//!     containing one fails to scan.

use super::LexError;
use crate::stone::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;

const COMMENT: usize = 1;
const NUMBER: usize = 2;
const STRING: usize = 3;
const IDENTIFIER: usize = 4;
const OPERATOR: usize = 5;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^\s*(?:"#,
        r#"(//.*)"#,
        r#"|([0-9]+)"#,
        r#"|("(?:\\"|\\\\|\\n|[^"])*")"#,
        r#"|([A-Za-z_][A-Za-z0-9_]*)"#,
        r#"|(==|<=|>=|&&|\|\||[!-/:-@\[-_{-~])"#,
        r#")?"#,
    ))
    .expect("token pattern is a valid regex")
});

/// Scan one physical line (terminator already stripped) into tokens.
///
/// Nothing is returned on failure, so a bad line never leaves half of its tokens behind.
pub fn scan_line(line: &str, line_no: usize) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        let caps = TOKEN_PATTERN
            .captures(rest)
            .ok_or_else(|| bad_token(line_no, pos, rest))?;
        let end = caps.get(0).map_or(0, |m| m.end());

        if let Some(m) = caps.get(NUMBER) {
            let value = m
                .as_str()
                .parse::<i64>()
                .map_err(|_| LexError::NumberOutOfRange {
                    line: line_no,
                    text: m.as_str().to_string(),
                })?;
            tokens.push(Token::number(line_no, value));
        } else if let Some(m) = caps.get(STRING) {
            tokens.push(Token::string(line_no, decode_string_literal(m.as_str())));
        } else if let Some(m) = caps.get(IDENTIFIER) {
            tokens.push(Token::identifier(line_no, m.as_str()));
        } else if let Some(m) = caps.get(OPERATOR) {
            tokens.push(Token::operator(line_no, m.as_str()));
        } else if caps.get(COMMENT).is_none() && end < rest.len() {
            // Only whitespace matched and something unscannable follows it.
            return Err(bad_token(line_no, pos + end, &rest[end..]));
        }
        pos += end;
    }

    Ok(tokens)
}

fn bad_token(line: usize, offset: usize, rest: &str) -> LexError {
    LexError::BadToken {
        line,
        column: offset + 1,
        near: rest.chars().take(10).collect(),
    }
}

/// Reduce a quoted literal to its contents.
///
/// `\"`, `\\` and `\n` are resolved; any other backslash stays in the text as is.
pub fn decode_string_literal(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&escaped @ ('"' | '\\')) => {
                    chars.next();
                    decoded.push(escaped);
                    continue;
                }
                Some('n') => {
                    chars.next();
                    decoded.push('\n');
                    continue;
                }
                _ => {}
            }
        }
        decoded.push(c);
    }
    decoded
}
