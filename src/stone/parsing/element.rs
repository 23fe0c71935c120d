//! Parser elements: the building blocks of a rule
//!
//!     A rule is a sequence of elements. Every element answers two questions:
//!
//!         matches   could it start at the current lexer position? (peek only)
//!         parse     consume its tokens and append zero or more nodes to the
//!                   rule's accumulator
//!
//!     Elements reference other rules by [RuleId]; the [Grammar] passed in resolves
//!     them. Token-shaped nodes are built through the token factory of their kind,
//!     rule results through the rule's list factory.

use super::error::ParseError;
use super::grammar::{Grammar, RuleId};
use super::operators::{Operators, Precedence};
use crate::stone::ast::{AstNode, NodeKind};
use crate::stone::lexing::Lexer;
use crate::stone::token::Token;
use std::collections::HashSet;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Another rule, appended as a single subtree
    Tree(RuleId),
    /// Ordered alternation, first alternative that parses wins
    Or(Vec<RuleId>),
    /// Zero or more (`once`: zero or one) repetitions of a rule
    Repeat { rule: RuleId, once: bool },
    /// Optional rule that leaves an empty node of the rule's kind when absent
    Maybe(RuleId),
    Number { kind: NodeKind },
    Identifier {
        kind: NodeKind,
        reserved: HashSet<String>,
    },
    Str { kind: NodeKind },
    /// One of `texts`, kept as a leaf
    Leaf { texts: Vec<String>, kind: NodeKind },
    /// One of `texts`, dropped
    Skip { texts: Vec<String> },
    /// Binary operator chain over `factor`, reduced through `kind`'s list factory
    Expr {
        kind: NodeKind,
        factor: RuleId,
        operators: Operators,
    },
}

impl Element {
    pub(crate) fn parse<R: BufRead>(
        &self,
        grammar: &Grammar,
        lexer: &mut Lexer<R>,
        res: &mut Vec<AstNode>,
    ) -> Result<(), ParseError> {
        match self {
            Element::Tree(rule) => {
                res.push(grammar.parse(*rule, lexer)?);
                Ok(())
            }
            Element::Or(alternatives) => {
                res.push(parse_choice(grammar, lexer, alternatives)?);
                Ok(())
            }
            Element::Repeat { rule, once } => {
                while grammar.matches(*rule, lexer)? {
                    let start = lexer.cursor();
                    let node = grammar.parse(*rule, lexer)?;
                    if !is_empty_list(&node) {
                        res.push(node);
                    }
                    if *once || lexer.cursor() == start {
                        break;
                    }
                }
                Ok(())
            }
            Element::Maybe(rule) => {
                let node = if grammar.matches(*rule, lexer)? {
                    grammar.parse(*rule, lexer)?
                } else {
                    grammar.build_empty(*rule)?
                };
                res.push(node);
                Ok(())
            }
            Element::Number { .. }
            | Element::Identifier { .. }
            | Element::Str { .. }
            | Element::Leaf { .. } => {
                let token = self.take_token(lexer)?;
                let kind = self.token_kind();
                res.push(grammar.token_factory(kind)?.make(token)?);
                Ok(())
            }
            Element::Skip { .. } => {
                self.take_token(lexer)?;
                Ok(())
            }
            Element::Expr {
                kind,
                factor,
                operators,
            } => {
                let expr = ExprParser {
                    grammar,
                    kind: *kind,
                    factor: *factor,
                    operators,
                };
                res.push(expr.parse(lexer)?);
                Ok(())
            }
        }
    }

    pub(crate) fn matches<R: BufRead>(
        &self,
        grammar: &Grammar,
        lexer: &mut Lexer<R>,
    ) -> Result<bool, ParseError> {
        match self {
            Element::Tree(rule) | Element::Repeat { rule, .. } | Element::Maybe(rule) => {
                grammar.matches(*rule, lexer)
            }
            Element::Or(alternatives) => {
                for rule in alternatives {
                    if grammar.matches(*rule, lexer)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Element::Expr { factor, .. } => grammar.matches(*factor, lexer),
            Element::Number { .. }
            | Element::Identifier { .. }
            | Element::Str { .. }
            | Element::Leaf { .. }
            | Element::Skip { .. } => Ok(self.accepts(lexer.peek(0)?)),
        }
    }

    /// Whether the element can succeed without consuming a token
    pub(crate) fn is_optional(&self) -> bool {
        matches!(self, Element::Repeat { .. } | Element::Maybe(_))
    }

    /// Rules this element refers to
    pub(crate) fn rule_refs(&self) -> Vec<RuleId> {
        match self {
            Element::Tree(rule) | Element::Repeat { rule, .. } | Element::Maybe(rule) => {
                vec![*rule]
            }
            Element::Or(alternatives) => alternatives.clone(),
            Element::Expr { factor, .. } => vec![*factor],
            Element::Number { .. }
            | Element::Identifier { .. }
            | Element::Str { .. }
            | Element::Leaf { .. }
            | Element::Skip { .. } => Vec::new(),
        }
    }

    /// Node kind this element builds from a single token, if any
    pub(crate) fn token_kind(&self) -> NodeKind {
        match self {
            Element::Number { kind }
            | Element::Identifier { kind, .. }
            | Element::Str { kind }
            | Element::Leaf { kind, .. } => *kind,
            _ => NodeKind::LEAF,
        }
    }

    pub(crate) fn builds_token(&self) -> bool {
        matches!(
            self,
            Element::Number { .. }
                | Element::Identifier { .. }
                | Element::Str { .. }
                | Element::Leaf { .. }
        )
    }

    fn accepts(&self, token: &Token) -> bool {
        match self {
            Element::Number { .. } => token.is_number(),
            Element::Identifier { reserved, .. } => {
                token.is_identifier() && !reserved.contains(&token.text())
            }
            Element::Str { .. } => token.is_string(),
            Element::Leaf { texts, .. } | Element::Skip { texts } => {
                texts.iter().any(|text| token.is_spelled(text))
            }
            _ => false,
        }
    }

    /// Read the next token if this element accepts it; nothing is consumed otherwise
    fn take_token<R: BufRead>(&self, lexer: &mut Lexer<R>) -> Result<Token, ParseError> {
        let next = lexer.peek(0)?;
        if !self.accepts(next) {
            return Err(ParseError::unexpected(next));
        }
        Ok(lexer.read()?)
    }
}

/// Generic empty lists carry nothing and are left out of repetitions
fn is_empty_list(node: &AstNode) -> bool {
    !node.is_leaf() && node.kind() == NodeKind::LIST && node.num_children() == 0
}

fn parse_choice<R: BufRead>(
    grammar: &Grammar,
    lexer: &mut Lexer<R>,
    alternatives: &[RuleId],
) -> Result<AstNode, ParseError> {
    let mut last_error = None;
    for rule in alternatives {
        if !grammar.matches(*rule, lexer)? {
            continue;
        }
        let checkpoint = lexer.checkpoint();
        match grammar.parse(*rule, lexer) {
            Ok(node) => {
                lexer.commit(checkpoint);
                return Ok(node);
            }
            Err(err) if err.is_recoverable() => {
                log::trace!(
                    "alternative '{}' rejected: {err}",
                    grammar.rule_name(*rule).unwrap_or("?")
                );
                lexer.rewind(checkpoint);
                last_error = Some(err);
            }
            Err(err) => {
                lexer.rewind(checkpoint);
                return Err(err);
            }
        }
    }
    match last_error {
        Some(err) => Err(err),
        None => Err(ParseError::unexpected(lexer.peek(0)?)),
    }
}

/// Precedence climbing over a factor rule
struct ExprParser<'g> {
    grammar: &'g Grammar,
    kind: NodeKind,
    factor: RuleId,
    operators: &'g Operators,
}

impl ExprParser<'_> {
    fn parse<R: BufRead>(&self, lexer: &mut Lexer<R>) -> Result<AstNode, ParseError> {
        let mut right = self.grammar.parse(self.factor, lexer)?;
        while let Some(prec) = self.next_operator(lexer)? {
            right = self.shift(lexer, right, prec)?;
        }
        Ok(right)
    }

    fn shift<R: BufRead>(
        &self,
        lexer: &mut Lexer<R>,
        left: AstNode,
        prec: Precedence,
    ) -> Result<AstNode, ParseError> {
        let op = self
            .grammar
            .token_factory(NodeKind::LEAF)?
            .make(lexer.read()?)?;
        let mut right = self.grammar.parse(self.factor, lexer)?;
        while let Some(next) = self.next_operator(lexer)? {
            if !prec.yields_to(next) {
                break;
            }
            right = self.shift(lexer, right, next)?;
        }
        self.grammar
            .list_factory(self.kind)?
            .make(vec![left, op, right])
    }

    fn next_operator<R: BufRead>(
        &self,
        lexer: &mut Lexer<R>,
    ) -> Result<Option<Precedence>, ParseError> {
        let next = lexer.peek(0)?;
        if next.is_identifier() || next.is_operator() {
            Ok(self.operators.get(&next.text()))
        } else {
            Ok(None)
        }
    }
}
