//! Stone language front end
//!
//!     source text -> lexing -> tokens -> parsing (grammar + factories) -> ast
//!
//!     token       the token model and the end-of-file sentinel
//!     lexing      line-oriented regex lexer with lookahead
//!     ast         leaf/list nodes tagged with a node kind
//!     parsing     parser elements, grammar builder and factory registry
//!     basic       the reference grammar of Stone's basic language
//!     formats     renderings of parsed programs (sexp, treeviz, json, yaml)
//!     config      layered configuration for the stone binary
//!     testing     fluent tree assertions used by the test suites

pub mod ast;
pub mod basic;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;
