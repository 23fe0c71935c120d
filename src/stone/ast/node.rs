//! AST node definitions
//!
//! Two shapes only: a leaf wrapping one token and a list owning ordered children.
//! Grammar-specific node types are [NodeKind] tags on those shapes, with typed
//! accessors on [AstLeaf] covering what a specialised leaf would add.

use super::error::AstError;
use crate::stone::token::{Token, TokenError, TokenKind};
use serde::Serialize;
use std::fmt;

const NO_CHILDREN: &[AstNode] = &[];

/// Identity of an AST node type as declared by a grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKind(&'static str);

impl NodeKind {
    /// Generic leaf, built from any token
    pub const LEAF: NodeKind = NodeKind("leaf");
    /// Generic list, built with the flatten-or-wrap strategy
    pub const LIST: NodeKind = NodeKind("list");

    pub const fn new(name: &'static str) -> Self {
        NodeKind(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Leaf(AstLeaf),
    List(AstList),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstLeaf {
    kind: NodeKind,
    token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstList {
    kind: NodeKind,
    children: Vec<AstNode>,
}

impl AstNode {
    pub fn leaf(token: Token) -> Self {
        Self::leaf_of(NodeKind::LEAF, token)
    }

    pub fn leaf_of(kind: NodeKind, token: Token) -> Self {
        AstNode::Leaf(AstLeaf { kind, token })
    }

    pub fn list(children: Vec<AstNode>) -> Self {
        Self::list_of(NodeKind::LIST, children)
    }

    pub fn list_of(kind: NodeKind, children: Vec<AstNode>) -> Self {
        AstNode::List(AstList { kind, children })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Leaf(leaf) => leaf.kind,
            AstNode::List(list) => list.kind,
        }
    }

    /// The `index`-th child; fails on leaves and past the last child
    pub fn child(&self, index: usize) -> Result<&AstNode, AstError> {
        match self {
            AstNode::Leaf(_) => Err(AstError::LeafHasNoChildren { index }),
            AstNode::List(list) => list.children.get(index).ok_or(AstError::ChildOutOfRange {
                index,
                count: list.children.len(),
            }),
        }
    }

    pub fn num_children(&self) -> usize {
        match self {
            AstNode::Leaf(_) => 0,
            AstNode::List(list) => list.children.len(),
        }
    }

    pub fn children(&self) -> std::slice::Iter<'_, AstNode> {
        match self {
            AstNode::Leaf(_) => NO_CHILDREN.iter(),
            AstNode::List(list) => list.children.iter(),
        }
    }

    /// Line of the first descendant that has one
    pub fn location(&self) -> Option<usize> {
        match self {
            AstNode::Leaf(leaf) => leaf.token.line(),
            AstNode::List(list) => list.children.iter().find_map(AstNode::location),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, AstNode::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&AstLeaf> {
        match self {
            AstNode::Leaf(leaf) => Some(leaf),
            AstNode::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&AstList> {
        match self {
            AstNode::List(list) => Some(list),
            AstNode::Leaf(_) => None,
        }
    }

    /// The wrapped token for leaves
    pub fn token(&self) -> Option<&Token> {
        self.as_leaf().map(AstLeaf::token)
    }

    /// Short label used by the tree formats: token text for leaves, kind for lists
    pub fn label(&self) -> String {
        match self {
            AstNode::Leaf(leaf) => leaf.token.text(),
            AstNode::List(list) => list.kind.to_string(),
        }
    }
}

impl AstLeaf {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn text(&self) -> String {
        self.token.text()
    }

    /// Value of a number literal leaf
    pub fn number_value(&self) -> Result<i64, TokenError> {
        self.token.number_value()
    }

    /// Name of an identifier leaf
    pub fn name(&self) -> Option<&str> {
        match self.token.kind() {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl AstList {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[AstNode] {
        &self.children
    }

    pub fn into_children(self) -> Vec<AstNode> {
        self.children
    }
}

impl<'a> IntoIterator for &'a AstNode {
    type Item = &'a AstNode;
    type IntoIter = std::slice::Iter<'a, AstNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children()
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Leaf(leaf) => f.write_str(&leaf.token.text()),
            AstNode::List(list) => {
                f.write_str("(")?;
                for (i, child) in list.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBER: NodeKind = NodeKind::new("number");

    fn sample() -> AstNode {
        AstNode::list(vec![
            AstNode::leaf_of(NUMBER, Token::number(2, 1)),
            AstNode::leaf(Token::operator(2, "+")),
            AstNode::leaf_of(NUMBER, Token::number(3, 2)),
        ])
    }

    #[test]
    fn test_child_in_range() {
        let node = sample();
        assert_eq!(node.num_children(), 3);
        assert_eq!(node.child(1).unwrap().label(), "+");
    }

    #[test]
    fn test_child_out_of_range() {
        let node = sample();
        for index in [3, 4, usize::MAX] {
            assert_eq!(
                node.child(index),
                Err(AstError::ChildOutOfRange { index, count: 3 })
            );
        }
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = AstNode::leaf(Token::identifier(1, "x"));
        assert_eq!(leaf.num_children(), 0);
        assert_eq!(leaf.children().count(), 0);
        assert_eq!(
            leaf.child(0),
            Err(AstError::LeafHasNoChildren { index: 0 })
        );
    }

    #[test]
    fn test_location_is_first_line_found() {
        let nested = AstNode::list(vec![AstNode::list(vec![]), sample()]);
        assert_eq!(nested.location(), Some(2));
    }

    #[test]
    fn test_location_of_empty_subtree() {
        assert_eq!(AstNode::list(vec![]).location(), None);
        assert_eq!(
            AstNode::list(vec![AstNode::list(vec![])]).location(),
            None
        );
    }

    #[test]
    fn test_display() {
        let node = AstNode::list(vec![sample(), AstNode::leaf(Token::string(4, "s"))]);
        assert_eq!(node.to_string(), "((1 + 2) s)");
        assert_eq!(AstNode::list(vec![]).to_string(), "()");
    }

    #[test]
    fn test_typed_leaf_accessors() {
        let node = sample();
        let first = node.child(0).unwrap().as_leaf().unwrap();
        assert_eq!(first.kind(), NUMBER);
        assert_eq!(first.number_value(), Ok(1));
        assert!(node.child(1).unwrap().as_leaf().unwrap().number_value().is_err());
    }

    #[test]
    fn test_iteration_order() {
        let labels: Vec<String> = sample().children().map(AstNode::label).collect();
        assert_eq!(labels, vec!["1", "+", "2"]);
    }
}
