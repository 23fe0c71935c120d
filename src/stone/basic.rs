//! Reference grammar for the Stone basic language
//!
//!     A grammar built purely on the public framework API, the same way a downstream
//!     language would define its own. It is what the `stone parse` command and the
//!     integration tests run.
//!
//! Grammar
//!
//!         primary   : "(" expr ")" | NUMBER | IDENTIFIER | STRING
//!         factor    : "-" primary | primary
//!         expr      : factor { OP factor }
//!         block     : "{" [ statement ] { (";" | EOL) [ statement ] } "}"
//!         simple    : expr
//!         statement : "if" expr block [ "else" block ]
//!                   | "while" expr block
//!                   | simple
//!         program   : [ statement ] (";" | EOL)
//!
//!     Operators, loosest first: `=` (right), `==` `>` `<`, `+` `-`, `*` `/` `%` (all
//!     left). `if`, `while` and `else` are reserved and never parse as names.
//!
//! Node kinds
//!
//!     Literals become leaves of `number`, `name` and `string`. `primary_expr` collapses
//!     to its only child, so a parenthesised expression is just the inner expression.
//!     Every other statement or expression kind always wraps its children, keywords and
//!     punctuation excluded: `if a { b } else { c }` is `if_stmt(a, block(b), block(c))`.
//!
//! Extending
//!
//!     [define] registers the rules into any [GrammarBuilder] and hands back their ids,
//!     so a richer language can layer on top with `insert_choice`, exactly like it would
//!     extend any other grammar.

use crate::stone::ast::{AstNode, NodeKind};
use crate::stone::lexing::Lexer;
use crate::stone::parsing::{
    Assoc, Grammar, GrammarBuilder, GrammarError, Operators, ParseError, Rule, RuleId,
};
use std::io::BufRead;

pub const NUMBER: NodeKind = NodeKind::new("number");
pub const NAME: NodeKind = NodeKind::new("name");
pub const STRING: NodeKind = NodeKind::new("string");
pub const NEGATIVE_EXPR: NodeKind = NodeKind::new("negative_expr");
pub const BINARY_EXPR: NodeKind = NodeKind::new("binary_expr");
pub const PRIMARY_EXPR: NodeKind = NodeKind::new("primary_expr");
pub const BLOCK: NodeKind = NodeKind::new("block");
pub const IF_STMT: NodeKind = NodeKind::new("if_stmt");
pub const WHILE_STMT: NodeKind = NodeKind::new("while_stmt");
pub const NULL_STMT: NodeKind = NodeKind::new("null_stmt");

pub const KEYWORDS: &[&str] = &["if", "while", "else"];

/// Statement separators: semicolon and end of line
const SEPARATORS: &[&str] = &[";", crate::stone::token::EOL_TEXT];

/// The binary operator table of the basic language
pub fn operators() -> Operators {
    Operators::new()
        .with("=", 1, Assoc::Right)
        .with("==", 2, Assoc::Left)
        .with(">", 2, Assoc::Left)
        .with("<", 2, Assoc::Left)
        .with("+", 3, Assoc::Left)
        .with("-", 3, Assoc::Left)
        .with("*", 4, Assoc::Left)
        .with("/", 4, Assoc::Left)
        .with("%", 4, Assoc::Left)
}

/// Ids of the basic rules inside the builder they were defined in
#[derive(Debug, Clone, Copy)]
pub struct BasicRules {
    pub primary: RuleId,
    pub factor: RuleId,
    pub expr: RuleId,
    pub block: RuleId,
    pub simple: RuleId,
    pub statement: RuleId,
    pub program: RuleId,
}

/// Register the basic node kinds and rules into `g`
pub fn define(g: &mut GrammarBuilder) -> Result<BasicRules, GrammarError> {
    g.factories_mut()
        .register_leaf(NUMBER)
        .register_leaf(NAME)
        .register_leaf(STRING)
        .register_list_factory(PRIMARY_EXPR, |mut children| {
            if children.len() == 1 {
                if let Some(only) = children.pop() {
                    return Ok(only);
                }
            }
            Ok(AstNode::list_of(PRIMARY_EXPR, children))
        });
    for kind in [NEGATIVE_EXPR, BINARY_EXPR, BLOCK, IF_STMT, WHILE_STMT, NULL_STMT] {
        g.factories_mut()
            .register_list_constructor(kind, move |children| Ok(AstNode::list_of(kind, children)));
    }

    let expr = g.declare("expr");
    let statement = g.declare("statement");

    let paren = g.add(Rule::new().sep(&["("]).ast(expr).sep(&[")"]));
    let number = g.add(Rule::new().number(NUMBER));
    let name = g.add(Rule::new().identifier(NAME, KEYWORDS));
    let string = g.add(Rule::new().string(STRING));
    let primary = g.add_named(
        "primary",
        Rule::of(PRIMARY_EXPR).or(&[paren, number, name, string]),
    );

    let negative = g.add(Rule::of(NEGATIVE_EXPR).sep(&["-"]).ast(primary));
    let factor = g.add_named("factor", Rule::new().or(&[negative, primary]));
    g.define(expr, Rule::new().expression(BINARY_EXPR, factor, operators()))?;

    let block_item = g.add(Rule::new().sep(SEPARATORS).option(statement));
    let block = g.add_named(
        "block",
        Rule::of(BLOCK)
            .sep(&["{"])
            .option(statement)
            .repeat(block_item)
            .sep(&["}"]),
    );

    let simple = g.add_named("simple", Rule::of(PRIMARY_EXPR).ast(expr));
    let else_part = g.add(Rule::new().sep(&["else"]).ast(block));
    let if_stmt = g.add_named(
        "if",
        Rule::of(IF_STMT)
            .sep(&["if"])
            .ast(expr)
            .ast(block)
            .option(else_part),
    );
    let while_stmt = g.add_named(
        "while",
        Rule::of(WHILE_STMT).sep(&["while"]).ast(expr).ast(block),
    );
    g.define(statement, Rule::new().or(&[if_stmt, while_stmt, simple]))?;

    // An empty statement only matches right before a separator.
    let full_line = g.add(Rule::new().ast(statement).sep(SEPARATORS));
    let null_line = g.add(Rule::of(NULL_STMT).sep(SEPARATORS));
    let program = g.add_named("program", Rule::new().or(&[full_line, null_line]));

    Ok(BasicRules {
        primary,
        factor,
        expr,
        block,
        simple,
        statement,
        program,
    })
}

/// The basic grammar, built and ready to parse
#[derive(Debug)]
pub struct BasicParser {
    grammar: Grammar,
    rules: BasicRules,
}

impl BasicParser {
    pub fn new() -> Result<Self, GrammarError> {
        let mut g = GrammarBuilder::new();
        let rules = define(&mut g)?;
        Ok(BasicParser {
            grammar: g.build()?,
            rules,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn rules(&self) -> &BasicRules {
        &self.rules
    }

    /// Parse one statement together with its separator
    pub fn parse<R: BufRead>(&self, lexer: &mut Lexer<R>) -> Result<AstNode, ParseError> {
        self.grammar.parse(self.rules.program, lexer)
    }

    /// Parse statements until end of input
    pub fn parse_all<R: BufRead>(&self, lexer: &mut Lexer<R>) -> Result<Vec<AstNode>, ParseError> {
        self.grammar.parse_all(self.rules.program, lexer)
    }
}

/// Parse a whole program held in memory
pub fn parse_program(source: &str) -> Result<Vec<AstNode>, ParseError> {
    let parser = BasicParser::new()?;
    let mut lexer = Lexer::from_source(source);
    parser.parse_all(&mut lexer)
}
