//! Treeviz formatter for parsed programs
//!
//! One line per node, nesting drawn with box characters, two columns per level:
//!
//!     <prefix><connector> <kind>: <label>
//!
//! The label is the token text for leaves and the node's `Display` for lists, cut to
//! 30 characters. For `x = 1 + 2`:
//!
//!     └─ binary_expr: (x = (1 + 2))
//!       ├─ name: x
//!       ├─ leaf: =
//!       └─ binary_expr: (1 + 2)
//!         ├─ number: 1
//!         ├─ leaf: +
//!         └─ number: 2

use super::registry::{FormatError, Formatter};
use crate::stone::ast::AstNode;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(nodes: &[AstNode]) -> String {
    let mut result = String::new();
    append_children(&mut result, nodes.iter(), "");
    result
}

fn append_node(result: &mut String, node: &AstNode, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let label = truncate(&node.to_string(), 30);
    result.push_str(&format!("{prefix}{connector} {}: {label}\n", node.kind()));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, node.children(), &new_prefix);
}

fn append_children<'a>(
    result: &mut String,
    children: impl ExactSizeIterator<Item = &'a AstNode>,
    prefix: &str,
) {
    let count = children.len();
    for (i, child) in children.enumerate() {
        append_node(result, child, prefix, i + 1 == count);
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError> {
        Ok(to_treeviz_str(nodes))
    }

    fn description(&self) -> &str {
        "One line per node with box-drawn nesting"
    }
}
