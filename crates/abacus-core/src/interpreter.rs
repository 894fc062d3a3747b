//! Reference evaluator for typed expression trees.
//!
//! The simplifier folds constants with this evaluator, so compile-time and
//! run-time results agree by construction. Backends are tested against it.

use crate::context::Context;
use crate::symbols::{SymbolError, SymbolTable};
use rhizome_abacus_ir::{BinaryOp, Node, NodeKind, Span, Type, UnaryOp, Value};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    Overflow { op: String },

    #[error("variable '{0}' has no value")]
    Unset(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("node at {0} has not been type checked")]
    Untyped(Span),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("{function}: {message}")]
    Function { function: String, message: String },
}

impl From<SymbolError> for EvalError {
    fn from(err: SymbolError) -> Self {
        match err {
            SymbolError::Unknown(name) => EvalError::UnknownVariable(name),
            other => EvalError::TypeMismatch(other.to_string()),
        }
    }
}

/// Evaluates checked trees against a symbol table.
///
/// Assignments write through to the table, so one table can be reused to
/// carry state between evaluations.
pub struct Evaluator<'a> {
    context: &'a Context,
    symbols: &'a mut SymbolTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context, symbols: &'a mut SymbolTable) -> Self {
        Self { context, symbols }
    }

    pub fn evaluate(&mut self, node: &Node) -> Result<Value, EvalError> {
        let result = self.eval(node);
        trace!(span = %node.span, ?result, "evaluated");
        result
    }

    fn eval(&mut self, node: &Node) -> Result<Value, EvalError> {
        let ty = node.ty().ok_or(EvalError::Untyped(node.span))?;
        match &node.kind {
            NodeKind::Literal { value } => convert(value, ty),
            NodeKind::Variable { name } => {
                let symbol = self.symbols.lookup(name)?;
                let value = symbol
                    .value
                    .as_ref()
                    .ok_or_else(|| EvalError::Unset(name.clone()))?;
                convert(value, ty)
            }
            NodeKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                unary(*op, value)
            }
            NodeKind::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let result = self.eval_bool(left)? && self.eval_bool(right)?;
                Ok(Value::Boolean(result))
            }
            NodeKind::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let result = self.eval_bool(left)? || self.eval_bool(right)?;
                Ok(Value::Boolean(result))
            }
            NodeKind::Binary { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                if op.is_arithmetic() {
                    arithmetic(*op, &lhs, &rhs, ty)
                } else {
                    self.comparison(*op, &lhs, &rhs)
                }
            }
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_bool(condition)? {
                    then_branch
                } else {
                    else_branch
                };
                let value = self.eval(branch)?;
                convert(&value, ty)
            }
            NodeKind::Call { name, args } => {
                let context = self.context;
                let function = context
                    .functions
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let types: Vec<Type> = values.iter().map(Value::ty).collect();
                let signature = function
                    .resolve(&types, context.widening())
                    .map_err(|err| EvalError::TypeMismatch(err.to_string()))?;
                let converted = values
                    .iter()
                    .zip(&signature.params)
                    .map(|(value, param)| convert(value, *param))
                    .collect::<Result<Vec<_>, _>>()?;
                let result = function.call(&converted)?;
                convert(&result, ty)
            }
            NodeKind::Assignment { name, value } => {
                let value = self.eval(value)?;
                let value = convert(&value, ty)?;
                self.symbols.assign(name, value.clone())?;
                Ok(value)
            }
        }
    }

    fn eval_bool(&mut self, node: &Node) -> Result<bool, EvalError> {
        let value = self.eval(node)?;
        value
            .as_bool()
            .ok_or_else(|| EvalError::TypeMismatch(format!("expected BOOLEAN, found {}", value.ty())))
    }

    fn comparison(&self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        let operand = self
            .context
            .widening()
            .unify(lhs.ty(), rhs.ty())
            .ok_or_else(|| mismatch(op, lhs, rhs))?;
        let lhs = convert(lhs, operand)?;
        let rhs = convert(rhs, operand)?;
        let result = match op {
            BinaryOp::Equal => lhs == rhs,
            BinaryOp::NotEqual => lhs != rhs,
            _ => {
                if operand == Type::Boolean {
                    return Err(mismatch(op, &lhs, &rhs));
                }
                // Unordered decimals (NaN) compare false.
                match lhs.compare(&rhs) {
                    Some(ordering) => match op {
                        BinaryOp::Less => ordering.is_lt(),
                        BinaryOp::LessEqual => ordering.is_le(),
                        BinaryOp::Greater => ordering.is_gt(),
                        BinaryOp::GreaterEqual => ordering.is_ge(),
                        _ => return Err(mismatch(op, &lhs, &rhs)),
                    },
                    None => false,
                }
            }
        };
        Ok(Value::Boolean(result))
    }
}

fn convert(value: &Value, ty: Type) -> Result<Value, EvalError> {
    value
        .convert(ty)
        .ok_or_else(|| EvalError::TypeMismatch(format!("cannot convert {} to {}", value.ty(), ty)))
}

fn mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeMismatch(format!(
        "operator '{}' cannot be applied to {} and {}",
        op,
        lhs.ty(),
        rhs.ty()
    ))
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Negate, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::Overflow { op: "-".into() }),
        (UnaryOp::Negate, Value::Decimal(x)) => Ok(Value::Decimal(-x)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, value) => Err(EvalError::TypeMismatch(format!(
            "operator '{}' cannot be applied to {}",
            op,
            value.ty()
        ))),
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value, ty: Type) -> Result<Value, EvalError> {
    match ty {
        Type::String if op == BinaryOp::Add => match (lhs, rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(mismatch(op, lhs, rhs)),
        },
        Type::Integer => match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => integer(op, *a, *b),
            _ => Err(mismatch(op, lhs, rhs)),
        },
        Type::Decimal => {
            let a = convert(lhs, Type::Decimal)?.as_decimal();
            let b = convert(rhs, Type::Decimal)?.as_decimal();
            match (a, b) {
                (Some(a), Some(b)) => decimal(op, a, b),
                _ => Err(mismatch(op, lhs, rhs)),
            }
        }
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

/// Checked integer arithmetic. Division truncates toward zero and the
/// remainder takes the sign of the dividend.
fn integer(op: BinaryOp, a: i64, b: i64) -> Result<Value, EvalError> {
    let result = match op {
        BinaryOp::Divide | BinaryOp::Modulo if b == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        BinaryOp::Divide => a.checked_div(b),
        BinaryOp::Modulo => a.checked_rem(b),
        _ => {
            return Err(mismatch(op, &Value::Integer(a), &Value::Integer(b)));
        }
    };
    result.map(Value::Integer).ok_or_else(|| EvalError::Overflow {
        op: op.symbol().to_string(),
    })
}

fn decimal(op: BinaryOp, a: f64, b: f64) -> Result<Value, EvalError> {
    let result = match op {
        BinaryOp::Divide | BinaryOp::Modulo if b == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => a / b,
        BinaryOp::Modulo => a % b,
        _ => {
            return Err(mismatch(op, &Value::Decimal(a), &Value::Decimal(b)));
        }
    };
    Ok(Value::Decimal(result))
}
