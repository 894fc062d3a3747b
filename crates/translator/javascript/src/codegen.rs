//! Abacus tree to JavaScript code generation.
//!
//! Output is a single ES5 expression. Checked arithmetic goes through
//! immediately-invoked functions that throw the same error classes direct
//! evaluation reports.

mod math;
mod string;

use rhizome_abacus_core::TranslationError;
use rhizome_abacus_core::translate::node_type;
use rhizome_abacus_ir::{BinaryOp, Node, NodeKind, Type, UnaryOp, Value};

pub(crate) use self::string::js_string_literal;

pub const BACKEND: &str = "javascript";

/// Reserved words, plus the global names an expression must not rebind.
const RESERVED: &[&str] = &[
    "Error", "Infinity", "Math", "NaN", "arguments", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "eval", "export",
    "extends", "false", "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "null", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined",
    "var", "void", "while", "with", "yield",
];

/// Convert a variable name to a safe JavaScript identifier.
///
/// Reserved names and names starting with `_` get a `_` prefix, so
/// distinct variables never share an identifier.
pub fn to_js_name(name: &str) -> String {
    if name.starts_with('_') || RESERVED.contains(&name) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Read a variable, throwing the evaluator's error when it has no value.
pub fn read_variable(name: &str) -> String {
    let ident = to_js_name(name);
    let message = js_string_literal(&format!("variable '{}' has no value", name));
    format!("({ident} != null ? {ident} : (function () {{ throw new Error({message}); }})())")
}

/// Compile a checked tree to a JavaScript expression.
pub fn compile(node: &Node) -> Result<String, TranslationError> {
    let ty = node_type(node)?;

    let code = match &node.kind {
        NodeKind::Literal { value } => js_literal(value),
        NodeKind::Variable { name } => read_variable(name),
        NodeKind::Unary { op, operand } => {
            let operand = compile(operand)?;
            match op {
                UnaryOp::Negate => format!("(-({}))", operand),
                UnaryOp::Not => format!("(!{})", operand),
            }
        }
        NodeKind::Binary { op, left, right } => {
            let left = compile(left)?;
            let right = compile(right)?;
            compile_binary(*op, &left, &right, ty)
        }
        NodeKind::Ternary {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "({} ? {} : {})",
            compile(condition)?,
            compile(then_branch)?,
            compile(else_branch)?
        ),
        NodeKind::Call { name, args } => {
            let args = args.iter().map(compile).collect::<Result<Vec<_>, _>>()?;
            math::compile_math(name, &args)
                .or_else(|| string::compile_str(name, &args))
                .ok_or_else(|| TranslationError::UnsupportedFunction {
                    backend: BACKEND,
                    name: name.clone(),
                })?
        }
        NodeKind::Assignment { name, value } => {
            format!("({} = {})", to_js_name(name), compile(value)?)
        }
    };

    Ok(code)
}

fn compile_binary(op: BinaryOp, left: &str, right: &str, ty: Type) -> String {
    let infix = |js_op: &str| format!("({} {} {})", left, js_op, right);
    match op {
        BinaryOp::Add => infix("+"),
        BinaryOp::Subtract => infix("-"),
        BinaryOp::Multiply => infix("*"),
        BinaryOp::Divide if ty == Type::Integer => math::integer_division(left, right),
        BinaryOp::Divide => math::decimal_division(left, right),
        BinaryOp::Modulo => math::remainder(left, right),
        // No implicit coercion in the source language.
        BinaryOp::Equal => infix("==="),
        BinaryOp::NotEqual => infix("!=="),
        BinaryOp::Less => infix("<"),
        BinaryOp::LessEqual => infix("<="),
        BinaryOp::Greater => infix(">"),
        BinaryOp::GreaterEqual => infix(">="),
        BinaryOp::And => infix("&&"),
        BinaryOp::Or => infix("||"),
    }
}

/// Render a value as a JavaScript literal. Dates are ISO strings.
pub fn js_literal(value: &Value) -> String {
    match value {
        Value::String(s) => js_string_literal(s),
        Value::Integer(n) if *n < 0 => format!("({})", n),
        Value::Integer(n) => n.to_string(),
        Value::Decimal(n) => js_number(*n),
        Value::Boolean(b) => b.to_string(),
        Value::Date(date) => js_string_literal(&date.to_string()),
    }
}

fn js_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "(-Infinity)" }.to_string()
    } else if n.is_sign_negative() {
        format!("({:?})", n)
    } else {
        format!("{:?}", n)
    }
}
