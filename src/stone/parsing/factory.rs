//! Factory registry: how each node kind is built from parse results
//!
//!     A grammar rule only names the [NodeKind] it produces. The registry maps
//!     (kind, argument shape) to a builder, where the shape is either a single token
//!     (token matchers) or the ordered list of subtrees a rule collected.
//!
//! Resolution order
//!
//!     1. a registered factory function for the shape
//!     2. a registered constructor for the shape
//!     3. list shape only: the flatten-or-wrap default, for [NodeKind::LIST] and for
//!        kinds that opted in with [FactoryRegistry::register_default]
//!
//!     Anything else is a [GrammarError::MissingFactory]. The generic [NodeKind::LEAF]
//!     kind comes with a token constructor. Resolved builders are cached per kind.
//!
//! Build failures
//!
//!     A builder returns [BuildError::InvalidArgument] to say "this input is not mine",
//!     which surfaces as a recoverable [ParseError::InvalidArgument]. Any other
//!     [BuildError] is a defect in the grammar and becomes
//!     [GrammarError::ConstructionFailed].

use super::error::{GrammarError, ParseError};
use crate::stone::ast::{AstNode, NodeKind};
use crate::stone::token::Token;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// The argument a builder expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgShape {
    Token,
    List,
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgShape::Token => f.write_str("token"),
            ArgShape::List => f.write_str("list"),
        }
    }
}

/// Failure reported by a builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Failed(String),
}

pub type TokenBuilder = Rc<dyn Fn(Token) -> Result<AstNode, BuildError>>;
pub type ListBuilder = Rc<dyn Fn(Vec<AstNode>) -> Result<AstNode, BuildError>>;

/// Resolved builder for a token-shaped node kind
#[derive(Clone)]
pub struct TokenFactory {
    kind: NodeKind,
    build: TokenBuilder,
}

/// Resolved builder for a list-shaped node kind
#[derive(Clone)]
pub struct ListFactory {
    kind: NodeKind,
    build: ListBuilder,
}

impl TokenFactory {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn make(&self, token: Token) -> Result<AstNode, ParseError> {
        let line = token.line();
        (self.build)(token).map_err(|err| classify(self.kind, line, err))
    }
}

impl ListFactory {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn make(&self, children: Vec<AstNode>) -> Result<AstNode, ParseError> {
        let line = children.iter().find_map(AstNode::location);
        (self.build)(children).map_err(|err| classify(self.kind, line, err))
    }
}

impl fmt::Debug for TokenFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenFactory").field("kind", &self.kind).finish()
    }
}

impl fmt::Debug for ListFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListFactory").field("kind", &self.kind).finish()
    }
}

fn classify(kind: NodeKind, line: Option<usize>, err: BuildError) -> ParseError {
    match err {
        BuildError::InvalidArgument(message) => ParseError::InvalidArgument {
            kind,
            line,
            message,
        },
        BuildError::Failed(message) => GrammarError::ConstructionFailed { kind, message }.into(),
    }
}

/// The default list strategy: a single subtree stands for itself, anything else is
/// wrapped in a list node of `kind`
pub fn flatten_or_wrap(kind: NodeKind) -> ListBuilder {
    Rc::new(move |mut children: Vec<AstNode>| {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }
        Ok(AstNode::list_of(kind, children))
    })
}

pub struct FactoryRegistry {
    token_factories: HashMap<NodeKind, TokenBuilder>,
    token_constructors: HashMap<NodeKind, TokenBuilder>,
    list_factories: HashMap<NodeKind, ListBuilder>,
    list_constructors: HashMap<NodeKind, ListBuilder>,
    defaults: HashSet<NodeKind>,
    resolved_tokens: HashMap<NodeKind, TokenFactory>,
    resolved_lists: HashMap<NodeKind, ListFactory>,
}

impl FactoryRegistry {
    /// Registry knowing only the generic leaf and list kinds
    pub fn new() -> Self {
        let mut registry = FactoryRegistry {
            token_factories: HashMap::new(),
            token_constructors: HashMap::new(),
            list_factories: HashMap::new(),
            list_constructors: HashMap::new(),
            defaults: HashSet::new(),
            resolved_tokens: HashMap::new(),
            resolved_lists: HashMap::new(),
        };
        registry.register_leaf(NodeKind::LEAF);
        registry.register_default(NodeKind::LIST);
        registry
    }

    pub fn register_token_factory<F>(&mut self, kind: NodeKind, build: F) -> &mut Self
    where
        F: Fn(Token) -> Result<AstNode, BuildError> + 'static,
    {
        self.resolved_tokens.remove(&kind);
        self.token_factories.insert(kind, Rc::new(build));
        self
    }

    pub fn register_token_constructor<F>(&mut self, kind: NodeKind, build: F) -> &mut Self
    where
        F: Fn(Token) -> Result<AstNode, BuildError> + 'static,
    {
        self.resolved_tokens.remove(&kind);
        self.token_constructors.insert(kind, Rc::new(build));
        self
    }

    pub fn register_list_factory<F>(&mut self, kind: NodeKind, build: F) -> &mut Self
    where
        F: Fn(Vec<AstNode>) -> Result<AstNode, BuildError> + 'static,
    {
        self.resolved_lists.remove(&kind);
        self.list_factories.insert(kind, Rc::new(build));
        self
    }

    pub fn register_list_constructor<F>(&mut self, kind: NodeKind, build: F) -> &mut Self
    where
        F: Fn(Vec<AstNode>) -> Result<AstNode, BuildError> + 'static,
    {
        self.resolved_lists.remove(&kind);
        self.list_constructors.insert(kind, Rc::new(build));
        self
    }

    /// Token constructor wrapping any token in a leaf of `kind`
    pub fn register_leaf(&mut self, kind: NodeKind) -> &mut Self {
        self.register_token_constructor(kind, move |token| Ok(AstNode::leaf_of(kind, token)))
    }

    /// Opt `kind` into the flatten-or-wrap list strategy
    pub fn register_default(&mut self, kind: NodeKind) -> &mut Self {
        self.resolved_lists.remove(&kind);
        self.defaults.insert(kind);
        self
    }

    pub fn resolve_token(&mut self, kind: NodeKind) -> Result<TokenFactory, GrammarError> {
        if let Some(factory) = self.resolved_tokens.get(&kind) {
            return Ok(factory.clone());
        }
        let build = self
            .token_factories
            .get(&kind)
            .or_else(|| self.token_constructors.get(&kind))
            .cloned()
            .ok_or(GrammarError::MissingFactory {
                kind,
                shape: ArgShape::Token,
            })?;
        log::debug!("resolved token factory for '{kind}'");
        let factory = TokenFactory { kind, build };
        self.resolved_tokens.insert(kind, factory.clone());
        Ok(factory)
    }

    pub fn resolve_list(&mut self, kind: NodeKind) -> Result<ListFactory, GrammarError> {
        if let Some(factory) = self.resolved_lists.get(&kind) {
            return Ok(factory.clone());
        }
        let build = match self
            .list_factories
            .get(&kind)
            .or_else(|| self.list_constructors.get(&kind))
        {
            Some(build) => build.clone(),
            None if self.defaults.contains(&kind) => flatten_or_wrap(kind),
            None => {
                return Err(GrammarError::MissingFactory {
                    kind,
                    shape: ArgShape::List,
                })
            }
        };
        log::debug!("resolved list factory for '{kind}'");
        let factory = ListFactory { kind, build };
        self.resolved_lists.insert(kind, factory.clone());
        Ok(factory)
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBER: NodeKind = NodeKind::new("number");
    const PAIR: NodeKind = NodeKind::new("pair");
    const GROUP: NodeKind = NodeKind::new("group");

    fn leaves(n: usize) -> Vec<AstNode> {
        (0..n)
            .map(|i| AstNode::leaf(Token::number(i + 1, i as i64)))
            .collect()
    }

    #[test]
    fn test_default_collapses_single_child() {
        let mut registry = FactoryRegistry::new();
        let factory = registry.resolve_list(NodeKind::LIST).unwrap();
        let only = leaves(1).remove(0);
        assert_eq!(factory.make(vec![only.clone()]).unwrap(), only);
    }

    #[test]
    fn test_default_wraps_in_order() {
        let mut registry = FactoryRegistry::new();
        let factory = registry.resolve_list(NodeKind::LIST).unwrap();
        let node = factory.make(leaves(3)).unwrap();
        assert_eq!(node.kind(), NodeKind::LIST);
        assert_eq!(node.to_string(), "(0 1 2)");

        let empty = factory.make(vec![]).unwrap();
        assert_eq!(empty.num_children(), 0);
    }

    #[test]
    fn test_default_requires_opt_in() {
        let mut registry = FactoryRegistry::new();
        assert_eq!(
            registry.resolve_list(GROUP).unwrap_err(),
            GrammarError::MissingFactory {
                kind: GROUP,
                shape: ArgShape::List
            }
        );

        registry.register_default(GROUP);
        let node = registry.resolve_list(GROUP).unwrap().make(leaves(2)).unwrap();
        assert_eq!(node.kind(), GROUP);
    }

    #[test]
    fn test_factory_wins_over_constructor() {
        let mut registry = FactoryRegistry::new();
        registry
            .register_list_constructor(PAIR, |children| Ok(AstNode::list_of(PAIR, children)))
            .register_list_factory(PAIR, |_| Ok(AstNode::list_of(PAIR, vec![])));

        let node = registry.resolve_list(PAIR).unwrap().make(leaves(2)).unwrap();
        assert_eq!(node.num_children(), 0);
    }

    #[test]
    fn test_missing_token_factory() {
        let mut registry = FactoryRegistry::new();
        assert_eq!(
            registry.resolve_token(NUMBER).unwrap_err(),
            GrammarError::MissingFactory {
                kind: NUMBER,
                shape: ArgShape::Token
            }
        );
        registry.register_leaf(NUMBER);
        let node = registry
            .resolve_token(NUMBER)
            .unwrap()
            .make(Token::number(1, 5))
            .unwrap();
        assert_eq!(node.kind(), NUMBER);
    }

    #[test]
    fn test_invalid_argument_is_recoverable() {
        let mut registry = FactoryRegistry::new();
        registry.register_token_constructor(NUMBER, |token| {
            if token.is_number() {
                Ok(AstNode::leaf_of(NUMBER, token))
            } else {
                Err(BuildError::InvalidArgument("expected a number".to_string()))
            }
        });
        let err = registry
            .resolve_token(NUMBER)
            .unwrap()
            .make(Token::identifier(9, "x"))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.line(), Some(9));
    }

    #[test]
    fn test_other_build_failures_are_fatal() {
        let mut registry = FactoryRegistry::new();
        registry.register_list_constructor(PAIR, |_| Err(BuildError::Failed("boom".to_string())));
        let err = registry.resolve_list(PAIR).unwrap().make(leaves(2)).unwrap_err();
        assert_eq!(
            err,
            ParseError::Grammar(GrammarError::ConstructionFailed {
                kind: PAIR,
                message: "boom".to_string()
            })
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_resolution_is_cached_until_reregistered() {
        let mut registry = FactoryRegistry::new();
        registry.register_list_constructor(PAIR, |c| Ok(AstNode::list_of(PAIR, c)));
        let first = registry.resolve_list(PAIR).unwrap();
        let second = registry.resolve_list(PAIR).unwrap();
        assert!(Rc::ptr_eq(&first.build, &second.build));

        registry.register_list_factory(PAIR, |c| Ok(AstNode::list_of(PAIR, c)));
        let third = registry.resolve_list(PAIR).unwrap();
        assert!(!Rc::ptr_eq(&first.build, &third.build));
    }
}
