//! S-expression format: every statement's `Display`, one per line

use super::registry::{FormatError, Formatter};
use crate::stone::ast::AstNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct SexpFormatter {
    /// Prefix each statement with the line it starts on
    pub show_lines: bool,
}

impl Formatter for SexpFormatter {
    fn name(&self) -> &str {
        "sexp"
    }

    fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError> {
        let mut out = String::new();
        for node in nodes {
            if self.show_lines {
                match node.location() {
                    Some(line) => out.push_str(&format!("{line:>4} | ")),
                    None => out.push_str("     | "),
                }
            }
            out.push_str(&node.to_string());
            out.push('\n');
        }
        Ok(out)
    }

    fn description(&self) -> &str {
        "Parenthesised tree, one statement per line"
    }
}
