//! Fluent assertions for AST nodes
//!
//! Checking a tree by hand means a ladder of `child(i).unwrap()` calls and matches on
//! node shapes. [assert_node] walks the tree instead and reports failures with the
//! path to the offending node:
//!
//! ```rust,ignore
//! use stone::stone::testing::assert_node;
//!
//! let nodes = parse_program("if x > 1 { y = 2 }\n")?;
//! assert_node(&nodes[0])
//!     .kind(IF_STMT)
//!     .child_count(2)
//!     .child(0, |cond| {
//!         cond.kind(BINARY_EXPR).sexp("(x > 1)");
//!     })
//!     .child(1, |block| {
//!         block.kind(BLOCK).child(0, |stmt| {
//!             stmt.sexp("(y = 2)");
//!         });
//!     });
//! ```

use crate::stone::ast::{AstNode, NodeKind};

/// Start an assertion chain on `node`
pub fn assert_node(node: &AstNode) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: "root".to_string(),
    }
}

pub struct NodeAssertion<'a> {
    node: &'a AstNode,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn kind(self, expected: NodeKind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: expected kind '{}', found '{}' ({})",
            self.context,
            expected,
            self.node.kind(),
            self.node
        );
        self
    }

    /// Assert the node is a leaf with the given token text
    pub fn text(self, expected: &str) -> Self {
        match self.node.as_leaf() {
            Some(leaf) => assert_eq!(
                leaf.text(),
                expected,
                "{}: expected leaf text '{}', found '{}'",
                self.context,
                expected,
                leaf.text()
            ),
            None => panic!(
                "{}: expected a leaf '{}', found list {}",
                self.context, expected, self.node
            ),
        }
        self
    }

    pub fn number(self, expected: i64) -> Self {
        let value = self.node.as_leaf().and_then(|leaf| leaf.number_value().ok());
        assert_eq!(
            value,
            Some(expected),
            "{}: expected number {}, found {}",
            self.context,
            expected,
            self.node
        );
        self
    }

    pub fn is_list(self) -> Self {
        assert!(
            !self.node.is_leaf(),
            "{}: expected a list, found leaf {}",
            self.context,
            self.node
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.num_children();
        assert_eq!(
            actual, expected,
            "{}: expected {} children, found {} in {}",
            self.context, expected, actual, self.node
        );
        self
    }

    /// Compare the whole subtree against its parenthesised rendering
    pub fn sexp(self, expected: &str) -> Self {
        assert_eq!(
            self.node.to_string(),
            expected,
            "{}: rendered tree differs",
            self.context
        );
        self
    }

    pub fn line(self, expected: usize) -> Self {
        assert_eq!(
            self.node.location(),
            Some(expected),
            "{}: expected node on line {}",
            self.context,
            expected
        );
        self
    }

    /// Run `assertion` on child `index`
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let child = match self.node.child(index) {
            Ok(child) => child,
            Err(err) => panic!("{}: {} in {}", self.context, err, self.node),
        };
        assertion(NodeAssertion {
            node: child,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }
}
