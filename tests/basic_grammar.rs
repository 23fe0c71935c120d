//! Tests for the basic reference grammar
//!
//! Expressions are checked through their parenthesised rendering, statements with
//! assert_node so the node kinds are verified as well as the shape.

use rstest::rstest;
use stone::stone::basic::{
    parse_program, BasicParser, BINARY_EXPR, BLOCK, IF_STMT, NAME, NEGATIVE_EXPR, NULL_STMT,
    NUMBER, STRING, WHILE_STMT,
};
use stone::stone::lexing::Lexer;
use stone::stone::parsing::ParseError;
use stone::stone::testing::assert_node;

fn parse_statement(source: &str) -> stone::stone::ast::AstNode {
    let mut nodes = parse_program(source).expect("source to parse");
    assert_eq!(nodes.len(), 1, "expected one statement in {source:?}");
    nodes.remove(0)
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 * 2 + 3", "((1 * 2) + 3)")]
#[case("1 - 2 - 3", "((1 - 2) - 3)")]
#[case("a = b = 1", "(a = (b = 1))")]
#[case("a = 1 + 2 == 3", "(a = ((1 + 2) == 3))")]
#[case("x < y == z > w", "(((x < y) == z) > w)")]
#[case("(1 + 2) * 3", "((1 + 2) * 3)")]
#[case("10 % 3 / 2", "((10 % 3) / 2)")]
#[case("((x))", "x")]
fn test_expression_shape(#[case] source: &str, #[case] expected: &str) {
    assert_node(&parse_statement(source)).sexp(expected);
}

#[rstest]
#[case("42", NUMBER)]
#[case("answer", NAME)]
#[case("\"text\"", STRING)]
#[case("-1", NEGATIVE_EXPR)]
#[case("1 + 1", BINARY_EXPR)]
#[case("while x { }", WHILE_STMT)]
#[case("if x { }", IF_STMT)]
fn test_statement_kind(#[case] source: &str, #[case] kind: stone::stone::ast::NodeKind) {
    assert_node(&parse_statement(source)).kind(kind);
}

#[test]
fn test_negative_operand() {
    let node = parse_statement("-x * 2");
    assert_node(&node)
        .kind(BINARY_EXPR)
        .child_count(3)
        .child(0, |neg| {
            neg.kind(NEGATIVE_EXPR).child_count(1).child(0, |x| {
                x.kind(NAME).text("x");
            });
        })
        .child(1, |op| {
            op.text("*");
        })
        .child(2, |two| {
            two.kind(NUMBER).number(2);
        });
}

#[test]
fn test_if_else() {
    let node = parse_statement("if a > 1 { b = 2 } else { b = 3; c }");
    assert_node(&node)
        .kind(IF_STMT)
        .child_count(3)
        .child(0, |cond| {
            cond.sexp("(a > 1)");
        })
        .child(1, |then| {
            then.kind(BLOCK).child_count(1).sexp("((b = 2))");
        })
        .child(2, |otherwise| {
            otherwise
                .kind(BLOCK)
                .child_count(2)
                .child(1, |c| {
                    c.kind(NAME).text("c");
                });
        });
}

#[test]
fn test_multiline_block() {
    let node = parse_statement("while i < 3 {\n  i = i + 1\n\n  j = i\n}");
    assert_node(&node)
        .kind(WHILE_STMT)
        .line(1)
        .child(1, |block| {
            block
                .kind(BLOCK)
                .child_count(2)
                .child(0, |s| {
                    s.sexp("(i = (i + 1))").line(2);
                })
                .child(1, |s| {
                    s.sexp("(j = i)").line(4);
                });
        });
}

#[test]
fn test_empty_block() {
    assert_node(&parse_statement("while x {}"))
        .child(1, |block| {
            block.kind(BLOCK).child_count(0);
        });
}

#[test]
fn test_statement_separators() {
    let nodes = parse_program("a = 1; b = 2\nc\n").unwrap();
    let rendered: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
    assert_eq!(rendered, vec!["(a = 1)", "(b = 2)", "c"]);
}

#[test]
fn test_blank_and_comment_lines_are_null_statements() {
    let nodes = parse_program("// header\n\nx\n").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_node(&nodes[0]).kind(NULL_STMT).child_count(0);
    assert_node(&nodes[1]).kind(NULL_STMT);
    assert_node(&nodes[2]).kind(NAME).line(3);
}

#[test]
fn test_string_escapes_survive_parsing() {
    let node = parse_statement(r#"s = "say \"hi\"\n""#);
    assert_node(&node).child(2, |s| {
        s.kind(STRING).text("say \"hi\"\n");
    });
}

#[rstest]
#[case("1 +\n", 1, "\\n")]
#[case("x = 1\n)\n", 2, ")")]
#[case("if x\n{ }\n", 1, "\\n")]
#[case("a b\n", 1, "b")]
#[case("while { }\n", 1, "{")]
fn test_syntax_errors_report_the_line(
    #[case] source: &str,
    #[case] line: usize,
    #[case] found: &str,
) {
    let err = parse_program(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::Unexpected {
            line: Some(line),
            found: found.to_string()
        }
    );
}

#[test]
fn test_missing_closing_brace_reports_end_of_input() {
    let err = parse_program("while x {\n").unwrap_err();
    assert_eq!(err.line(), None);
    assert_eq!(err.to_string(), "syntax error around the last line");
}

#[test]
fn test_lex_error_aborts_parse() {
    let err = parse_program("a = 1\nb = `2`\n").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_parser_is_reusable() {
    let parser = BasicParser::new().unwrap();
    for source in ["x = 1\n", "if y { z }\n"] {
        let mut lexer = Lexer::from_source(source);
        assert!(parser.parse(&mut lexer).is_ok());
        assert!(lexer.peek(0).unwrap().is_eof());
    }
}

#[rstest]
#[case("samples/fib.stone", 6)]
#[case("samples/even.stone", 5)]
#[case("samples/expressions.stone", 3)]
fn test_sample_programs(#[case] path: &str, #[case] statements: usize) {
    let source = std::fs::read_to_string(path).expect("sample to exist");
    let nodes = parse_program(&source).expect("sample to parse");
    assert_eq!(nodes.len(), statements);
}

#[test]
fn test_expressions_sample_snapshot() {
    let source = std::fs::read_to_string("samples/expressions.stone").unwrap();
    let rendered: Vec<String> = parse_program(&source)
        .unwrap()
        .iter()
        .map(|n| n.to_string())
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r###"
    (x = ((((1 + 2)) * 3) % 4))
    (y = (x == 3))
    (z = a "quoted" word)
    "###);
}
