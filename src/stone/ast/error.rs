//! Errors raised by AST navigation

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("child index {index} out of range for node with {count} children")]
    ChildOutOfRange { index: usize, count: usize },
    #[error("leaf nodes have no children (asked for child {index})")]
    LeafHasNoChildren { index: usize },
}
