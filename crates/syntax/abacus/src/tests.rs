//! Tests for the Abacus lexer and parser.

use super::*;
use rhizome_abacus_ir::sexpr::SExprFactory;
use rhizome_abacus_ir::{BinaryOp, NodeKind, Span, Value};
use serde_json::{Value as Json, json};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("tokenize failed")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn assert_parse(source: &str, expected: Json) {
    let result = parse_with(source, SExprFactory, DEFAULT_MAX_DEPTH).expect("parse failed");
    assert_eq!(result, expected, "source: {}", source);
}

fn parse_error(source: &str) -> ParseError {
    match parse(source) {
        Err(SyntaxError::Parse(err)) => err,
        other => panic!("expected parse error for {:?}, got {:?}", source, other),
    }
}

fn lex_error(source: &str) -> LexError {
    match parse(source) {
        Err(SyntaxError::Lex(err)) => err,
        other => panic!("expected lex error for {:?}, got {:?}", source, other),
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[test]
fn test_number_literals() {
    assert_eq!(
        kinds("42 3.14 1e3 2.5E-1"),
        vec![
            TokenKind::Literal(Value::Integer(42)),
            TokenKind::Literal(Value::Decimal(3.14)),
            TokenKind::Literal(Value::Decimal(1000.0)),
            TokenKind::Literal(Value::Decimal(0.25)),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_literals() {
    assert_eq!(
        kinds(r#"'big' "small" 'it\'s' "a\nb""#),
        vec![
            TokenKind::Literal(Value::from("big")),
            TokenKind::Literal(Value::from("small")),
            TokenKind::Literal(Value::from("it's")),
            TokenKind::Literal(Value::from("a\nb")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_boolean_and_date_literals() {
    assert_eq!(
        kinds("true false #2024-01-31#"),
        vec![
            TokenKind::Literal(Value::Boolean(true)),
            TokenKind::Literal(Value::Boolean(false)),
            TokenKind::Literal(Value::Date("2024-01-31".parse().unwrap())),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operators() {
    assert_eq!(
        kinds("== != <= >= < > = && || ! and or not ? : + - * / % ( ) ,"),
        vec![
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Assign,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    assert_eq!(
        kinds("  1 /* one */ +\t/**/2  "),
        vec![
            TokenKind::Literal(Value::Integer(1)),
            TokenKind::Plus,
            TokenKind::Literal(Value::Integer(2)),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_token_positions_and_text() {
    let tokens = tokenize("ab + 'x'").unwrap();
    assert_eq!(tokens[0].text, "ab");
    assert_eq!(tokens[0].span, Span::new(0, 2));
    assert_eq!(tokens[2].text, "'x'");
    assert_eq!(tokens[2].span, Span::new(5, 8));
    assert_eq!(tokens[3].span, Span::new(8, 8));
}

#[test]
fn test_lexer_is_lazy_and_restartable() {
    let mut lexer = Lexer::new("1 + @");
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());

    lexer.restart();
    let first = lexer.next().unwrap().unwrap();
    assert_eq!(first.kind, TokenKind::Literal(Value::Integer(1)));
}

#[test]
fn test_lexer_ends_after_eof() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Identifier);
    assert!(lexer.next().unwrap().unwrap().is_eof());
    assert!(lexer.next().is_none());
}

#[test]
fn test_lex_errors() {
    assert!(matches!(
        lex_error("'abc"),
        LexError::UnterminatedString { span } if span.start == 0
    ));
    assert!(matches!(
        lex_error("1 + $"),
        LexError::UnexpectedCharacter { ch: '$', span } if span.start == 4
    ));
    assert!(matches!(lex_error("1 /* open"), LexError::UnterminatedComment { .. }));
    assert!(matches!(lex_error("'\\q'"), LexError::InvalidEscape { escape: 'q', .. }));
    assert!(matches!(lex_error("12abc"), LexError::InvalidNumber { .. }));
    assert!(matches!(
        lex_error("99999999999999999999"),
        LexError::InvalidNumber { .. }
    ));
    assert!(matches!(lex_error("#2023-02-29#"), LexError::InvalidDate { .. }));
    assert!(matches!(lex_error("#2023-02-01"), LexError::UnterminatedDate { .. }));
    assert!(matches!(lex_error("a & b"), LexError::UnexpectedCharacter { ch: '&', .. }));
}

// ============================================================================
// Parser
// ============================================================================

#[test]
fn test_parse_literals_and_variables() {
    assert_parse("42", json!(42));
    assert_parse("'hi'", json!("hi"));
    assert_parse("true", json!(true));
    assert_parse("x", json!(["var", "x"]));
    assert_parse("#2020-02-02#", json!(["date", "2020-02-02"]));
}

#[test]
fn test_multiplicative_binds_tighter() {
    assert_parse("1 + 2 * 3", json!(["+", 1, ["*", 2, 3]]));
    assert_parse("2 * (3 + 4)", json!(["*", 2, ["+", 3, 4]]));
}

#[test]
fn test_left_associativity() {
    assert_parse("10 - 3 - 2", json!(["-", ["-", 10, 3], 2]));
    assert_parse("8 / 4 % 3", json!(["%", ["/", 8, 4], 3]));
}

#[test]
fn test_logical_precedence() {
    assert_parse(
        "a or b and not c",
        json!(["||", ["var", "a"], ["&&", ["var", "b"], ["!", ["var", "c"]]]]),
    );
    assert_parse(
        "1 < 2 == true",
        json!(["==", ["<", 1, 2], true]),
    );
}

#[test]
fn test_unary() {
    assert_parse("-x", json!(["neg", ["var", "x"]]));
    assert_parse("- -1", json!(["neg", ["neg", 1]]));
    assert_parse("-2 * 3", json!(["*", ["neg", 2], 3]));
}

#[test]
fn test_ternary_is_right_associative() {
    assert_parse(
        "a ? 1 : b ? 2 : 3",
        json!(["?:", ["var", "a"], 1, ["?:", ["var", "b"], 2, 3]]),
    );
    assert_parse(
        "x > 3 ? 'big' : 'small'",
        json!(["?:", [">", ["var", "x"], 3], "big", "small"]),
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_parse("a = a + 1", json!(["=", "a", ["+", ["var", "a"], 1]]));
    assert_parse("a = b = 3", json!(["=", "a", ["=", "b", 3]]));
    assert_parse(
        "a = c ? 1 : 2",
        json!(["=", "a", ["?:", ["var", "c"], 1, 2]]),
    );
}

#[test]
fn test_function_calls() {
    assert_parse("rand()", json!(["call", "rand"]));
    assert_parse(
        "max(1, a = 2)",
        json!(["call", "max", 1, ["=", "a", 2]]),
    );
    assert_parse(
        "abs(-x) + 1",
        json!(["+", ["call", "abs", ["neg", ["var", "x"]]], 1]),
    );
}

#[test]
fn test_parse_into_nodes() {
    let node = parse("1 + x").unwrap();
    assert_eq!(node.span, Span::new(0, 5));
    assert!(node.ty().is_none());
    let NodeKind::Binary { op, left, right } = node.kind else {
        panic!("expected binary node");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(left.as_literal(), Some(&Value::Integer(1)));
    assert!(matches!(right.kind, NodeKind::Variable { ref name } if name == "x"));
}

#[test]
fn test_parse_errors() {
    assert!(matches!(parse_error("1 +"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("(1 + 2"), ParseError::UnclosedParenthesis { .. }));
    assert!(matches!(parse_error("1 + 2)"), ParseError::UnmatchedParenthesis { .. }));
    assert!(matches!(parse_error("1 2"), ParseError::TrailingInput { .. }));
    assert!(matches!(parse_error("f(1, 2"), ParseError::UnclosedParenthesis { .. }));
    assert!(matches!(parse_error("a ? 1"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("1 = 2"), ParseError::InvalidAssignmentTarget { .. }));
    assert!(matches!(parse_error("(a) = 2"), ParseError::InvalidAssignmentTarget { .. }));
    assert!(matches!(parse_error(""), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_parse_error_positions() {
    let err = parse_error("1 + * 2");
    assert_eq!(err.span(), Span::new(4, 5));
    assert!(err.to_string().contains("'*'"));
}

#[test]
fn test_deep_nesting_is_a_parse_error() {
    let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    assert!(matches!(parse_error(&source), ParseError::TooDeep { .. }));

    let source = format!("{}1", "-".repeat(1000));
    assert!(matches!(parse_error(&source), ParseError::TooDeep { .. }));

    let chain = vec!["1"; 300].join(" + ");
    assert!(matches!(parse_error(&chain), ParseError::TooDeep { .. }));
}

#[test]
fn test_custom_depth_limit() {
    assert!(parse_with("((1))", SExprFactory, 8).is_ok());
    assert!(matches!(
        parse_with("((((((((1))))))))", SExprFactory, 4),
        Err(SyntaxError::Parse(ParseError::TooDeep { limit: 4, .. }))
    ));
}
