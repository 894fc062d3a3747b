//! S-expression trees built from the same grammar.
//!
//! Literals map to JSON scalars; everything else is a list whose head names
//! the operation:
//!
//! ```json
//! ["=", "a", ["+", ["var", "a"], 1]]
//! ```

use crate::{BinaryOp, NodeFactory, Span, UnaryOp, Value};
use serde_json::{Value as Json, json};

/// Builds `serde_json::Value` S-expressions instead of [`crate::Node`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SExprFactory;

fn call(head: &str, args: impl IntoIterator<Item = Json>) -> Json {
    let mut items = vec![Json::String(head.to_string())];
    items.extend(args);
    Json::Array(items)
}

impl NodeFactory for SExprFactory {
    type Node = Json;

    fn literal(&mut self, value: Value, _span: Span) -> Json {
        match value {
            Value::String(s) => Json::String(s),
            Value::Integer(n) => json!(n),
            Value::Decimal(n) => json!(n),
            Value::Boolean(b) => Json::Bool(b),
            Value::Date(d) => call("date", [Json::String(d.to_string())]),
        }
    }

    fn variable(&mut self, name: String, _span: Span) -> Json {
        call("var", [Json::String(name)])
    }

    fn unary(&mut self, op: UnaryOp, operand: Json, _span: Span) -> Json {
        let head = match op {
            UnaryOp::Negate => "neg",
            UnaryOp::Not => op.symbol(),
        };
        call(head, [operand])
    }

    fn binary(&mut self, op: BinaryOp, left: Json, right: Json, _span: Span) -> Json {
        call(op.symbol(), [left, right])
    }

    fn ternary(&mut self, condition: Json, then_branch: Json, else_branch: Json, _span: Span) -> Json {
        call("?:", [condition, then_branch, else_branch])
    }

    fn call(&mut self, name: String, args: Vec<Json>, _span: Span) -> Json {
        call("call", std::iter::once(Json::String(name)).chain(args))
    }

    fn assignment(&mut self, name: String, value: Json, _span: Span) -> Json {
        call("=", [Json::String(name), value])
    }
}
