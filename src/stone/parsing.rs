//! Declarative parsing framework
//!
//!     A grammar is built from [Rule]s, each a sequence of [Element]s, and registered in
//!     a [GrammarBuilder] together with a [FactoryRegistry] describing how every node
//!     kind is constructed. `build()` validates the rules and resolves all factories up
//!     front; the resulting [Grammar] is immutable and can parse any number of inputs.
//!
//! Layout
//!
//!     element     the matchers (token classes, alternation, repetition, expressions)
//!     grammar     rule arena, builder and the parse entry points
//!     factory     (node kind, argument shape) -> builder resolution
//!     operators   precedence table for the expression element
//!     error       ParseError and GrammarError
//!
//! Backtracking
//!
//!     Alternation is the only place that backtracks. It takes a lexer checkpoint before
//!     trying an alternative and rewinds to it when that alternative fails with a
//!     recoverable error (see [ParseError::is_recoverable]).

pub mod element;
pub mod error;
pub mod factory;
pub mod grammar;
pub mod operators;

pub use element::Element;
pub use error::{GrammarError, ParseError};
pub use factory::{ArgShape, BuildError, FactoryRegistry, ListFactory, TokenFactory};
pub use grammar::{Grammar, GrammarBuilder, Rule, RuleId};
pub use operators::{Assoc, Operators, Precedence};
