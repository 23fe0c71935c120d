//! Token model shared by the lexer, the parser elements and the AST.
//!
//!     A token is an immutable lexical unit tagged with the physical line it was scanned
//!     from. The kind is a closed enum so every consumer matches exhaustively:
//!
//!         Number      integer literal, value already parsed
//!         String      string literal, escapes already resolved
//!         Identifier  names and reserved words
//!         Operator    punctuation and multi-character operators
//!         Eol         explicit end-of-line marker emitted after every physical line
//!         Eof         the end-of-file sentinel, see [EOF]
//!
//!     Reserved words are plain identifiers at this level, the grammar decides which
//!     identifiers it reserves.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Display text of the end-of-line marker.
pub const EOL_TEXT: &str = "\\n";

/// The end-of-file sentinel. It carries no line and is never constructed ad hoc.
pub static EOF: Token = Token {
    line: 0,
    kind: TokenKind::Eof,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TokenKind {
    Number(i64),
    String(String),
    Identifier(String),
    Operator(String),
    Eol,
    Eof,
}

/// Error raised when a token is queried for a payload it does not carry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("not a number token: '{text}'")]
    NotANumber { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    line: usize,
    kind: TokenKind,
}

impl Token {
    pub fn number(line: usize, value: i64) -> Self {
        Self {
            line,
            kind: TokenKind::Number(value),
        }
    }

    pub fn string(line: usize, decoded: impl Into<String>) -> Self {
        Self {
            line,
            kind: TokenKind::String(decoded.into()),
        }
    }

    pub fn identifier(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            kind: TokenKind::Identifier(text.into()),
        }
    }

    pub fn operator(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            kind: TokenKind::Operator(text.into()),
        }
    }

    pub fn eol(line: usize) -> Self {
        Self {
            line,
            kind: TokenKind::Eol,
        }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Source line of this token, `None` for the end-of-file sentinel
    pub fn line(&self) -> Option<usize> {
        match self.kind {
            TokenKind::Eof => None,
            _ => Some(self.line),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, TokenKind::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String(_))
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier(_))
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, TokenKind::Operator(_))
    }

    pub fn is_eol(&self) -> bool {
        matches!(self.kind, TokenKind::Eol)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Integer value of a number token
    pub fn number_value(&self) -> Result<i64, TokenError> {
        match self.kind {
            TokenKind::Number(value) => Ok(value),
            _ => Err(TokenError::NotANumber { text: self.text() }),
        }
    }

    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Number(value) => value.to_string(),
            TokenKind::String(s) | TokenKind::Identifier(s) | TokenKind::Operator(s) => s.clone(),
            TokenKind::Eol => EOL_TEXT.to_string(),
            TokenKind::Eof => String::new(),
        }
    }

    /// Whether this token is spelled `text` in a grammar rule.
    ///
    /// Identifiers, operators and the end-of-line marker (spelled [EOL_TEXT]) take part;
    /// literals never match by text.
    pub fn is_spelled(&self, text: &str) -> bool {
        match &self.kind {
            TokenKind::Identifier(s) | TokenKind::Operator(s) => s == text,
            TokenKind::Eol => text == EOL_TEXT,
            TokenKind::Number(_) | TokenKind::String(_) | TokenKind::Eof => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Number(value) => write!(f, "Number({value})"),
            TokenKind::String(s) => write!(f, "String({s:?})"),
            TokenKind::Identifier(s) => write!(f, "Identifier({s})"),
            TokenKind::Operator(s) => write!(f, "Operator({s})"),
            TokenKind::Eol => f.write_str("EOL"),
            TokenKind::Eof => f.write_str("EOF"),
        }
    }
}
