//! Abacus tree to Lua code generation.
//!
//! Every expression becomes a single Lua expression. Constructs Lua has no
//! expression form for (ternaries, assignments, checked division) are
//! wrapped in immediately-invoked functions.

mod math;
mod string;

use rhizome_abacus_core::TranslationError;
use rhizome_abacus_core::translate::node_type;
use rhizome_abacus_ir::{BinaryOp, Node, NodeKind, Type, UnaryOp, Value};
use std::collections::HashSet;

pub(crate) use self::string::lua_string_literal;

pub const BACKEND: &str = "luajit";

/// Lua keywords, plus the globals generated code calls into.
fn lua_reserved() -> HashSet<&'static str> {
    [
        "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
        "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
        "error", "math", "select", "string",
    ]
    .into_iter()
    .collect()
}

/// Convert a variable name to a safe Lua identifier.
///
/// Reserved names and names starting with `_` get a `_` prefix. Distinct
/// variables never share an identifier, and `_` followed by an unreserved
/// letter-initial name is left free for generated locals.
pub fn to_lua_name(name: &str) -> String {
    if name.starts_with('_') || lua_reserved().contains(name) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Read a variable, raising the evaluator's error when it has no value.
pub fn read_variable(name: &str) -> String {
    let ident = to_lua_name(name);
    let message = lua_string_literal(&format!("variable '{}' has no value", name));
    format!("({ident} == nil and error({message}, 0) or {ident})")
}

/// Compile a checked tree to a Lua chunk returning its value.
pub fn compile(node: &Node) -> Result<String, TranslationError> {
    compile_value(node, true)
}

fn compile_value(node: &Node, should_return: bool) -> Result<String, TranslationError> {
    let prefix = if should_return { "return " } else { "" };
    let ty = node_type(node)?;

    let code = match &node.kind {
        NodeKind::Literal { value } => lua_literal(value),
        NodeKind::Variable { name } => read_variable(name),
        NodeKind::Unary { op, operand } => {
            let operand = compile_value(operand, false)?;
            match op {
                // Wrap in parens to handle negative numbers: -((-3)) not (--3)
                UnaryOp::Negate => format!("(-({}))", operand),
                UnaryOp::Not => format!("(not {})", operand),
            }
        }
        NodeKind::Binary { op, left, right } => {
            let left = compile_value(left, false)?;
            let right = compile_value(right, false)?;
            compile_binary(*op, &left, &right, ty)
        }
        NodeKind::Ternary {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "(function() if {} then return {} else return {} end end)()",
            compile_value(condition, false)?,
            compile_value(then_branch, false)?,
            compile_value(else_branch, false)?
        ),
        NodeKind::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| compile_value(arg, false))
                .collect::<Result<Vec<_>, _>>()?;
            math::compile_math(name, &args)
                .or_else(|| string::compile_str(name, &args))
                .ok_or_else(|| TranslationError::UnsupportedFunction {
                    backend: BACKEND,
                    name: name.clone(),
                })?
        }
        NodeKind::Assignment { name, value } => {
            let name = to_lua_name(name);
            let value = compile_value(value, false)?;
            format!("(function() {name} = {value}; return {name} end)()")
        }
    };

    Ok(format!("{}{}", prefix, code))
}

fn compile_binary(op: BinaryOp, left: &str, right: &str, ty: Type) -> String {
    let infix = |lua_op: &str| format!("({} {} {})", left, lua_op, right);
    match op {
        BinaryOp::Add if ty == Type::String => infix(".."),
        BinaryOp::Add => infix("+"),
        BinaryOp::Subtract => infix("-"),
        BinaryOp::Multiply => infix("*"),
        BinaryOp::Divide if ty == Type::Integer => math::integer_division(left, right),
        BinaryOp::Divide => math::decimal_division(left, right),
        BinaryOp::Modulo => math::remainder(left, right),
        BinaryOp::Equal => infix("=="),
        BinaryOp::NotEqual => infix("~="),
        BinaryOp::Less => infix("<"),
        BinaryOp::LessEqual => infix("<="),
        BinaryOp::Greater => infix(">"),
        BinaryOp::GreaterEqual => infix(">="),
        BinaryOp::And => infix("and"),
        BinaryOp::Or => infix("or"),
    }
}

/// Render a value as a Lua literal. Dates are ISO strings, which compare
/// correctly as Lua strings.
pub fn lua_literal(value: &Value) -> String {
    match value {
        Value::String(s) => lua_string_literal(s),
        Value::Integer(n) if *n < 0 => format!("({})", n),
        Value::Integer(n) => n.to_string(),
        Value::Decimal(n) => lua_number(*n),
        Value::Boolean(b) => b.to_string(),
        Value::Date(date) => lua_string_literal(&date.to_string()),
    }
}

fn lua_number(n: f64) -> String {
    if n.is_nan() {
        "(0/0)".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "(1/0)" } else { "(-1/0)" }.to_string()
    } else if n.is_sign_negative() {
        format!("({:?})", n)
    } else {
        format!("{:?}", n)
    }
}
