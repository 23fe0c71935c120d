//! Error types for grammar construction and parsing
//!
//! [ParseError] is what every parse call returns. Two of its variants are recoverable:
//! an alternation catches them and moves on to its next option. Everything else (lexing
//! failures and grammar defects) aborts the parse.

use super::factory::ArgShape;
use crate::stone::ast::NodeKind;
use crate::stone::lexing::LexError;
use crate::stone::token::Token;
use thiserror::Error;

/// Defects in the grammar definition itself; never caused by user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("no {shape} factory or constructor registered for node kind '{kind}'")]
    MissingFactory { kind: NodeKind, shape: ArgShape },
    #[error("rule '{name}' was declared but never defined")]
    UndefinedRule { name: String },
    #[error("rule id {id} does not belong to this grammar")]
    UnknownRule { id: usize },
    #[error("rule '{name}' does not start with an alternation")]
    NotAnAlternation { name: String },
    #[error("building a '{kind}' node failed: {message}")]
    ConstructionFailed { kind: NodeKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("syntax error around {}", describe_position(.found, .line))]
    Unexpected { line: Option<usize>, found: String },
    #[error("cannot build '{kind}' {}: {message}", describe_line(.line))]
    InvalidArgument {
        kind: NodeKind,
        line: Option<usize>,
        message: String,
    },
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// An expected element was absent where `token` sits
    pub fn unexpected(token: &Token) -> Self {
        ParseError::Unexpected {
            line: token.line(),
            found: token.text(),
        }
    }

    /// True for failures an alternation may recover from by trying its next option
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::Unexpected { .. } | ParseError::InvalidArgument { .. }
        )
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Lex(err) => Some(err.line()),
            ParseError::Unexpected { line, .. } | ParseError::InvalidArgument { line, .. } => *line,
            ParseError::Grammar(_) => None,
        }
    }
}

fn describe_position(found: &str, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("\"{found}\" at line {line}"),
        None => "the last line".to_string(),
    }
}

fn describe_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("at line {line}"),
        None => "at end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stone::token::EOF;

    #[test]
    fn test_unexpected_message() {
        let err = ParseError::unexpected(&Token::operator(4, ")"));
        assert_eq!(err.to_string(), "syntax error around \")\" at line 4");
        assert_eq!(err.line(), Some(4));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = ParseError::unexpected(&EOF);
        assert_eq!(err.to_string(), "syntax error around the last line");
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        let lex: ParseError = LexError::BadToken {
            line: 2,
            column: 1,
            near: "`".to_string(),
        }
        .into();
        assert!(!lex.is_recoverable());
        assert_eq!(lex.line(), Some(2));

        let grammar: ParseError = GrammarError::UndefinedRule {
            name: "expr".to_string(),
        }
        .into();
        assert!(!grammar.is_recoverable());
    }
}
