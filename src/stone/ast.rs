//! Abstract syntax tree produced by the parser elements
//!
//!     Every node is either a leaf (one token) or a list (ordered children). Nodes are
//!     immutable once built, own their children exclusively and keep no parent links.
//!     Downstream consumers only need the navigation contract on [AstNode]: `child`,
//!     `num_children`, `children`, `location` and `Display`.

pub mod error;
pub mod node;

pub use error::AstError;
pub use node::{AstLeaf, AstList, AstNode, NodeKind};
