//! Tests for abacus-ir.

use crate::sexpr::SExprFactory;
use crate::{
    AbacusNodeFactory, BinaryOp, Date, Node, NodeFactory, NodeKind, Span, Type, Value,
    WideningPolicy, WideningRule,
};
use serde_json::json;

#[test]
fn test_type_names() {
    assert_eq!(Type::Integer.to_string(), "INTEGER");
    assert_eq!("decimal".parse::<Type>(), Ok(Type::Decimal));
    assert!("NUMBER".parse::<Type>().is_err());
}

#[test]
fn test_default_widening() {
    let policy = WideningPolicy::default();
    assert!(policy.widens(Type::Integer, Type::Decimal));
    assert!(!policy.widens(Type::Decimal, Type::Integer));
    assert!(!policy.widens(Type::Integer, Type::String));
    assert_eq!(policy.unify(Type::Integer, Type::Decimal), Some(Type::Decimal));
    assert_eq!(policy.unify(Type::Decimal, Type::Integer), Some(Type::Decimal));
    assert_eq!(policy.unify(Type::String, Type::Integer), None);
}

#[test]
fn test_strict_widening() {
    let policy = WideningPolicy::strict();
    assert!(policy.widens(Type::Integer, Type::Integer));
    assert_eq!(policy.unify(Type::Integer, Type::Decimal), None);
}

#[test]
fn test_widening_rule_support() {
    let supported = WideningRule {
        from: Type::Integer,
        to: Type::Decimal,
    };
    let unsupported = WideningRule {
        from: Type::Integer,
        to: Type::String,
    };
    assert!(supported.is_supported());
    assert!(!unsupported.is_supported());
}

#[test]
fn test_value_convert() {
    assert_eq!(
        Value::Integer(3).convert(Type::Decimal),
        Some(Value::Decimal(3.0))
    );
    assert_eq!(Value::Decimal(3.5).convert(Type::Integer), None);
    assert_eq!(Value::from("x").convert(Type::String), Some(Value::from("x")));
}

#[test]
fn test_value_compare_does_not_coerce() {
    assert!(Value::Integer(1).compare(&Value::Decimal(1.0)).is_none());
    assert!(Value::Boolean(true).compare(&Value::Boolean(false)).is_none());
    assert_eq!(
        Value::from("a").compare(&Value::from("b")),
        Some(std::cmp::Ordering::Less)
    );
}

#[test]
fn test_parse_typed_values() {
    assert_eq!(Value::parse_typed(Type::Integer, "5"), Ok(Value::Integer(5)));
    assert_eq!(
        Value::parse_typed(Type::Decimal, "2.5"),
        Ok(Value::Decimal(2.5))
    );
    assert_eq!(
        Value::parse_typed(Type::Boolean, "true"),
        Ok(Value::Boolean(true))
    );
    assert!(Value::parse_typed(Type::Integer, "five").is_err());
    assert!(Value::parse_typed(Type::Decimal, "inf").is_err());
    assert!(Value::parse_typed(Type::Date, "2024-02-30").is_err());
}

#[test]
fn test_dates() {
    let date: Date = "2024-02-29".parse().unwrap();
    assert_eq!(date.to_string(), "2024-02-29");
    assert!("2023-02-29".parse::<Date>().is_err());
    assert!("2024-1-01".parse::<Date>().is_err());
    assert!("2024-13-01".parse::<Date>().is_err());

    let earlier: Date = "1999-12-31".parse().unwrap();
    assert!(earlier < date);
}

#[test]
fn test_decimal_display_is_unambiguous() {
    assert_eq!(Value::Decimal(14.0).to_string(), "14.0");
    assert_eq!(Value::Integer(14).to_string(), "14");
}

#[test]
fn test_value_json_shape() {
    let json = serde_json::to_value(Value::Integer(3)).unwrap();
    assert_eq!(json, json!({"type": "INTEGER", "value": 3}));

    let date = Value::Date("2020-01-01".parse().unwrap());
    let json = serde_json::to_value(&date).unwrap();
    assert_eq!(json, json!({"type": "DATE", "value": "2020-01-01"}));
    let back: Value = serde_json::from_value(json).unwrap();
    assert_eq!(back, date);
}

#[test]
fn test_factory_builds_untyped_nodes() {
    let mut factory = AbacusNodeFactory;
    let left = factory.literal(Value::Integer(1), Span::new(0, 1));
    let right = factory.variable("x".into(), Span::new(4, 5));
    let sum = factory.binary(BinaryOp::Add, left, right, Span::new(0, 5));

    assert_eq!(sum.ty(), None);
    assert_eq!(sum.size(), 3);
    assert!(!sum.is_fully_typed());
    assert!(matches!(sum.kind, NodeKind::Binary { op: BinaryOp::Add, .. }));
}

#[test]
fn test_annotate() {
    let mut node = Node::new(NodeKind::Variable { name: "x".into() }, Span::new(0, 1));
    node.annotate(Type::Integer);
    assert_eq!(node.ty(), Some(Type::Integer));
    assert!(node.is_fully_typed());

    let literal = Node::typed_literal(Value::from("s"), Span::default());
    assert_eq!(literal.ty(), Some(Type::String));
}

#[test]
fn test_sexpr_factory() {
    let mut factory = SExprFactory;
    let a = factory.variable("a".into(), Span::default());
    let one = factory.literal(Value::Integer(1), Span::default());
    let sum = factory.binary(BinaryOp::Add, a, one, Span::default());
    let assign = factory.assignment("a".into(), sum, Span::default());

    assert_eq!(assign, json!(["=", "a", ["+", ["var", "a"], 1]]));
}

#[test]
fn test_node_json_omits_missing_type() {
    let node = Node::new(
        NodeKind::Variable { name: "x".into() },
        Span::new(0, 1),
    );
    let json = serde_json::to_value(&node).unwrap();
    assert!(json.get("type").is_none());
    assert_eq!(json["kind"], json!({"node": "variable", "name": "x"}));
}
