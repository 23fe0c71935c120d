//! Format registry for rendering parsed programs
//!
//! Every format implements [Formatter] and is looked up by name in a [FormatRegistry].

use crate::stone::ast::AstNode;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Renders a program, given as its top-level statements
pub trait Formatter {
    /// Name the format is registered under (e.g. "treeviz")
    fn name(&self) -> &str;

    fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// An empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any previous one with the same name
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, nodes: &[AstNode], format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(nodes)
    }

    /// Registered format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry holding every built-in format
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::SexpFormatter::default());
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stone::token::Token;

    struct CountFormatter;
    impl Formatter for CountFormatter {
        fn name(&self) -> &str {
            "count"
        }
        fn serialize(&self, nodes: &[AstNode]) -> Result<String, FormatError> {
            Ok(nodes.len().to_string())
        }
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        assert!(!registry.has("count"));
        registry.register(CountFormatter);
        assert!(registry.has("count"));
        assert_eq!(registry.list_formats(), vec!["count"]);
        assert_eq!(registry.get("count").map(|f| f.description()), Some(""));
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(CountFormatter);
        let nodes = vec![AstNode::leaf(Token::number(1, 1))];
        assert_eq!(registry.serialize(&nodes, "count").unwrap(), "1");
    }

    #[test]
    fn test_registry_unknown_format() {
        let registry = FormatRegistry::new();
        assert_eq!(
            registry.serialize(&[], "nope").unwrap_err(),
            FormatError::FormatNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_registry_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["json", "sexp", "treeviz", "yaml"]
        );
    }
}
