//! AST snapshot: a plain, serializable mirror of the tree
//!
//! The JSON and YAML formats serialize snapshots instead of the nodes themselves, so
//! the wire shape stays stable whatever the in-memory representation does:
//!
//!     node_type   the node kind ("binary_expr", "number", ...)
//!     label       token text for leaves, empty for lists
//!     line        source line, when the node has one
//!     children    child snapshots, omitted for leaves

use super::registry::{FormatError, Formatter};
use crate::stone::ast::AstNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstSnapshot {
    pub node_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: String, label: String) -> Self {
        Self {
            node_type,
            label,
            line: None,
            children: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }
}

impl From<&AstNode> for AstSnapshot {
    fn from(node: &AstNode) -> Self {
        let label = match node {
            AstNode::Leaf(leaf) => leaf.text(),
            AstNode::List(_) => String::new(),
        };
        AstSnapshot::new(node.kind().to_string(), label)
            .with_line(node.location())
            .with_children(node.children().map(AstSnapshot::from).collect())
    }
}

fn snapshots(nodes: &[AstNode]) -> Vec<AstSnapshot> {
    nodes.iter().map(AstSnapshot::from).collect()
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&snapshots(nodes))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "AST snapshot as JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError> {
        serde_yaml::to_string(&snapshots(nodes))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "AST snapshot as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stone::basic::parse_program;

    #[test]
    fn test_snapshot_mirrors_tree() {
        let nodes = parse_program("-x\n").unwrap();
        let snapshot = AstSnapshot::from(&nodes[0]);
        assert_eq!(snapshot.node_type, "negative_expr");
        assert_eq!(snapshot.label, "");
        assert_eq!(snapshot.line, Some(1));
        assert_eq!(
            snapshot.children,
            vec![AstSnapshot::new("name".to_string(), "x".to_string()).with_line(Some(1))]
        );
    }

    #[test]
    fn test_json_round_trips_through_serde() {
        let nodes = parse_program("if a { b }\n").unwrap();
        let json = JsonFormatter.serialize(&nodes).unwrap();
        let back: Vec<AstSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshots(&nodes));
        assert_eq!(back[0].node_type, "if_stmt");
        assert_eq!(back[0].children[1].node_type, "block");
    }

    #[test]
    fn test_yaml_output() {
        let nodes = parse_program("7\n").unwrap();
        let yaml = YamlFormatter.serialize(&nodes).unwrap();
        assert_eq!(yaml, "- node_type: number\n  label: '7'\n  line: 1\n");
    }
}
