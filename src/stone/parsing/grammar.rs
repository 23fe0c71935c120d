//! Rules, the grammar builder and the built grammar
//!
//!     Rules live in an arena owned by the grammar and refer to each other by [RuleId],
//!     so recursive grammars are just ids pointing back up. A rule can be declared before
//!     it is defined:
//!
//!         let mut g = GrammarBuilder::new();
//!         let expr = g.declare("expr");
//!         let paren = g.add(Rule::new().sep(&["("]).ast(expr).sep(&[")"]));
//!         let number = g.add(Rule::new().number(NodeKind::LEAF));
//!         let primary = g.add_named("primary", Rule::new().or(&[paren, number]));
//!         g.define(expr, Rule::new().expression(BINARY, primary, operators))?;
//!         let grammar = g.build()?;
//!
//!     `build` checks that every declared rule got a definition and resolves the factory
//!     of every node kind the rules mention, so a broken grammar fails there and not in
//!     the middle of a parse.

use super::element::Element;
use super::error::{GrammarError, ParseError};
use super::factory::{FactoryRegistry, ListFactory, TokenFactory};
use super::operators::Operators;
use crate::stone::ast::{AstNode, NodeKind};
use crate::stone::lexing::Lexer;
use std::collections::HashMap;
use std::io::BufRead;

/// Handle to a rule inside one grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A sequence of elements producing a node of `kind`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    kind: NodeKind,
    elements: Vec<Element>,
}

impl Rule {
    /// Untyped rule; its result goes through the flatten-or-wrap default
    pub fn new() -> Self {
        Self::of(NodeKind::LIST)
    }

    /// Rule building nodes of `kind`
    pub fn of(kind: NodeKind) -> Self {
        Rule {
            kind,
            elements: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn number(mut self, kind: NodeKind) -> Self {
        self.elements.push(Element::Number { kind });
        self
    }

    /// An identifier that is not one of `reserved`
    pub fn identifier(mut self, kind: NodeKind, reserved: &[&str]) -> Self {
        self.elements.push(Element::Identifier {
            kind,
            reserved: reserved.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn string(mut self, kind: NodeKind) -> Self {
        self.elements.push(Element::Str { kind });
        self
    }

    /// One of `texts`, kept in the tree as a generic leaf
    pub fn token(mut self, texts: &[&str]) -> Self {
        self.elements.push(Element::Leaf {
            texts: texts.iter().map(|s| s.to_string()).collect(),
            kind: NodeKind::LEAF,
        });
        self
    }

    /// One of `texts`, matched and dropped
    pub fn sep(mut self, texts: &[&str]) -> Self {
        self.elements.push(Element::Skip {
            texts: texts.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn ast(mut self, rule: RuleId) -> Self {
        self.elements.push(Element::Tree(rule));
        self
    }

    pub fn or(mut self, alternatives: &[RuleId]) -> Self {
        self.elements.push(Element::Or(alternatives.to_vec()));
        self
    }

    pub fn repeat(mut self, rule: RuleId) -> Self {
        self.elements.push(Element::Repeat { rule, once: false });
        self
    }

    pub fn option(mut self, rule: RuleId) -> Self {
        self.elements.push(Element::Repeat { rule, once: true });
        self
    }

    pub fn maybe(mut self, rule: RuleId) -> Self {
        self.elements.push(Element::Maybe(rule));
        self
    }

    pub fn expression(mut self, kind: NodeKind, factor: RuleId, operators: Operators) -> Self {
        self.elements.push(Element::Expr {
            kind,
            factor,
            operators,
        });
        self
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    rule: Option<Rule>,
}

pub struct GrammarBuilder {
    slots: Vec<Slot>,
    factories: FactoryRegistry,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::with_factories(FactoryRegistry::new())
    }

    pub fn with_factories(factories: FactoryRegistry) -> Self {
        GrammarBuilder {
            slots: Vec::new(),
            factories,
        }
    }

    pub fn factories_mut(&mut self) -> &mut FactoryRegistry {
        &mut self.factories
    }

    /// Reserve a rule to be defined later
    pub fn declare(&mut self, name: &str) -> RuleId {
        self.slots.push(Slot {
            name: name.to_string(),
            rule: None,
        });
        RuleId(self.slots.len() - 1)
    }

    pub fn define(&mut self, id: RuleId, rule: Rule) -> Result<(), GrammarError> {
        let slot = self
            .slots
            .get_mut(id.0)
            .ok_or(GrammarError::UnknownRule { id: id.0 })?;
        slot.rule = Some(rule);
        Ok(())
    }

    pub fn add(&mut self, rule: Rule) -> RuleId {
        let name = format!("#{}", self.slots.len());
        self.add_named(&name, rule)
    }

    pub fn add_named(&mut self, name: &str, rule: Rule) -> RuleId {
        self.slots.push(Slot {
            name: name.to_string(),
            rule: Some(rule),
        });
        RuleId(self.slots.len() - 1)
    }

    /// Make `alternative` the first option of the alternation `target` starts with
    pub fn insert_choice(&mut self, target: RuleId, alternative: RuleId) -> Result<(), GrammarError> {
        let slot = self
            .slots
            .get_mut(target.0)
            .ok_or(GrammarError::UnknownRule { id: target.0 })?;
        match slot.rule.as_mut().and_then(|r| r.elements.first_mut()) {
            Some(Element::Or(alternatives)) => {
                alternatives.insert(0, alternative);
                Ok(())
            }
            _ => Err(GrammarError::NotAnAlternation {
                name: slot.name.clone(),
            }),
        }
    }

    /// Validate the rules and resolve every factory they need
    pub fn build(mut self) -> Result<Grammar, GrammarError> {
        let count = self.slots.len();
        let mut rules = Vec::with_capacity(count);
        let mut token_factories = HashMap::new();
        let mut list_factories = HashMap::new();

        for slot in self.slots {
            let rule = slot.rule.ok_or_else(|| GrammarError::UndefinedRule {
                name: slot.name.clone(),
            })?;

            list_factories
                .entry(rule.kind)
                .or_insert(self.factories.resolve_list(rule.kind)?);
            for element in &rule.elements {
                if let Some(id) = element.rule_refs().into_iter().find(|id| id.0 >= count) {
                    return Err(GrammarError::UnknownRule { id: id.0 });
                }
                if element.builds_token() {
                    let kind = element.token_kind();
                    token_factories
                        .entry(kind)
                        .or_insert(self.factories.resolve_token(kind)?);
                }
                if let Element::Expr { kind, .. } = element {
                    list_factories
                        .entry(*kind)
                        .or_insert(self.factories.resolve_list(*kind)?);
                    // Operators become generic leaves.
                    token_factories
                        .entry(NodeKind::LEAF)
                        .or_insert(self.factories.resolve_token(NodeKind::LEAF)?);
                }
            }
            rules.push(NamedRule {
                name: slot.name,
                rule,
            });
        }

        log::debug!(
            "grammar built: {} rules, {} token kinds, {} list kinds",
            rules.len(),
            token_factories.len(),
            list_factories.len()
        );
        Ok(Grammar {
            rules,
            token_factories,
            list_factories,
        })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct NamedRule {
    name: String,
    rule: Rule,
}

/// A validated grammar, ready to parse
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<NamedRule>,
    token_factories: HashMap<NodeKind, TokenFactory>,
    list_factories: HashMap<NodeKind, ListFactory>,
}

impl Grammar {
    /// Parse one `rule` at the lexer's position
    pub fn parse<R: BufRead>(
        &self,
        rule: RuleId,
        lexer: &mut Lexer<R>,
    ) -> Result<AstNode, ParseError> {
        let rule = self.rule(rule)?;
        let mut res = Vec::new();
        for element in &rule.elements {
            element.parse(self, lexer, &mut res)?;
        }
        self.list_factory(rule.kind)?.make(res)
    }

    /// Whether `rule` could start at the lexer's position; consumes nothing
    pub fn matches<R: BufRead>(
        &self,
        rule: RuleId,
        lexer: &mut Lexer<R>,
    ) -> Result<bool, ParseError> {
        for element in &self.rule(rule)?.elements {
            if element.matches(self, lexer)? {
                return Ok(true);
            }
            if !element.is_optional() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Parse `rule` repeatedly until end of input
    pub fn parse_all<R: BufRead>(
        &self,
        rule: RuleId,
        lexer: &mut Lexer<R>,
    ) -> Result<Vec<AstNode>, ParseError> {
        let mut nodes = Vec::new();
        while !lexer.peek(0)?.is_eof() {
            let start = lexer.cursor();
            nodes.push(self.parse(rule, lexer)?);
            if lexer.cursor() == start {
                return Err(ParseError::unexpected(lexer.peek(0)?));
            }
        }
        Ok(nodes)
    }

    pub fn rule_name(&self, rule: RuleId) -> Option<&str> {
        self.rules.get(rule.0).map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The node `rule` builds from an empty collection
    pub(crate) fn build_empty(&self, rule: RuleId) -> Result<AstNode, ParseError> {
        let rule = self.rule(rule)?;
        self.list_factory(rule.kind)?.make(Vec::new())
    }

    pub(crate) fn token_factory(&self, kind: NodeKind) -> Result<&TokenFactory, GrammarError> {
        self.token_factories
            .get(&kind)
            .ok_or(GrammarError::MissingFactory {
                kind,
                shape: super::factory::ArgShape::Token,
            })
    }

    pub(crate) fn list_factory(&self, kind: NodeKind) -> Result<&ListFactory, GrammarError> {
        self.list_factories
            .get(&kind)
            .ok_or(GrammarError::MissingFactory {
                kind,
                shape: super::factory::ArgShape::List,
            })
    }

    fn rule(&self, rule: RuleId) -> Result<&Rule, GrammarError> {
        self.rules
            .get(rule.0)
            .map(|r| &r.rule)
            .ok_or(GrammarError::UnknownRule { id: rule.0 })
    }
}
