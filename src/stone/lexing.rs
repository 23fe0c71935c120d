//! Line-oriented lexer with arbitrary lookahead
//!
//!     The lexer pulls physical lines from any `BufRead` on demand. Each line is scanned
//!     with a single combined pattern (see [patterns]) and the resulting tokens, followed
//!     by an end-of-line marker, are appended to an owned buffer. `read` advances a head
//!     index into that buffer, `peek(k)` looks k tokens past it, scanning more lines only
//!     when the buffer runs short.
//!
//!     Once the source is exhausted the lexer answers every `read`/`peek` past the last
//!     token with [EOF]; it never leaves that state.
//!
//!     Consumed tokens are dropped from the buffer unless a checkpoint is outstanding.
//!     Checkpoints are how the alternation element puts the lexer back where it was after
//!     a rejected alternative; they are not part of the public consumer contract.

pub mod patterns;

use crate::stone::token::{Token, EOF};
use serde::Deserialize;
use std::io::BufRead;
use thiserror::Error;

/// Errors raised while scanning source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("bad token at line {line}, column {column}: '{near}'")]
    BadToken {
        line: usize,
        column: usize,
        near: String,
    },
    #[error("integer literal '{text}' out of range at line {line}")]
    NumberOutOfRange { line: usize, text: String },
    #[error("failed to read line {line}: {message}")]
    Io { line: usize, message: String },
}

impl LexError {
    /// 1-based line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            LexError::BadToken { line, .. }
            | LexError::NumberOutOfRange { line, .. }
            | LexError::Io { line, .. } => *line,
        }
    }
}

/// Knobs for the lexer, usually loaded from the `[lexer]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LexerOptions {
    /// Append an end-of-line marker after every physical line
    pub emit_eol: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self { emit_eol: true }
    }
}

/// Opaque position handed out by [Lexer::checkpoint]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint(usize);

pub struct Lexer<R> {
    reader: R,
    options: LexerOptions,
    buffer: Vec<Token>,
    head: usize,
    /// Tokens already dropped from the front of `buffer`
    discarded: usize,
    /// Outstanding checkpoints; consumed tokens are kept while non-zero
    pins: usize,
    has_more: bool,
    line_no: usize,
}

impl<'a> Lexer<&'a [u8]> {
    /// Lexer over in-memory source text
    pub fn from_source(source: &'a str) -> Self {
        Lexer::new(source.as_bytes())
    }
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, LexerOptions::default())
    }

    pub fn with_options(reader: R, options: LexerOptions) -> Self {
        Self {
            reader,
            options,
            buffer: Vec::new(),
            head: 0,
            discarded: 0,
            pins: 0,
            has_more: true,
            line_no: 0,
        }
    }

    /// Remove and return the next token, or [EOF] once the source is exhausted
    pub fn read(&mut self) -> Result<Token, LexError> {
        if !self.fill_queue(0)? {
            return Ok(EOF.clone());
        }
        let token = self.buffer[self.head].clone();
        self.head += 1;
        self.compact();
        Ok(token)
    }

    /// The token `k` positions ahead of the next one, without consuming anything
    pub fn peek(&mut self, k: usize) -> Result<&Token, LexError> {
        if self.fill_queue(k)? {
            Ok(&self.buffer[self.head + k])
        } else {
            Ok(&EOF)
        }
    }

    /// Number of physical lines read so far
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Absolute index of the next token since the start of input
    pub(crate) fn cursor(&self) -> usize {
        self.discarded + self.head
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.pins += 1;
        Checkpoint(self.cursor())
    }

    /// Put the head back to `checkpoint` and release it
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        log::trace!(
            "rewinding lexer from token {} to {}",
            self.cursor(),
            checkpoint.0
        );
        self.head = checkpoint.0.saturating_sub(self.discarded);
        self.release();
    }

    /// Keep everything consumed since `checkpoint` and release it
    pub(crate) fn commit(&mut self, _checkpoint: Checkpoint) {
        self.release();
        self.compact();
    }

    fn release(&mut self) {
        self.pins = self.pins.saturating_sub(1);
    }

    fn compact(&mut self) {
        if self.pins == 0 && self.head > 0 {
            self.buffer.drain(..self.head);
            self.discarded += self.head;
            self.head = 0;
        }
    }

    /// Make sure the buffer holds at least `k + 1` unread tokens.
    ///
    /// Returns false when the source ran out first.
    fn fill_queue(&mut self, k: usize) -> Result<bool, LexError> {
        while self.head + k >= self.buffer.len() {
            if !self.has_more {
                return Ok(false);
            }
            self.read_line()?;
        }
        Ok(true)
    }

    fn read_line(&mut self) -> Result<(), LexError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| LexError::Io {
                line: self.line_no + 1,
                message: e.to_string(),
            })?;
        if read == 0 {
            log::trace!("source exhausted after {} lines", self.line_no);
            self.has_more = false;
            return Ok(());
        }

        self.line_no += 1;
        let text = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(&line);

        let tokens = patterns::scan_line(text, self.line_no)?;
        log::trace!("line {}: {} tokens", self.line_no, tokens.len());
        self.buffer.extend(tokens);
        if self.options.emit_eol {
            self.buffer.push(Token::eol(self.line_no));
        }
        Ok(())
    }
}

/// Iterates tokens up to, not including, end of file
impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(token) if token.is_eof() => None,
            other => Some(other),
        }
    }
}

/// Read every token of `source`, end-of-line markers included, EOF excluded
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::from_source(source).collect()
}
