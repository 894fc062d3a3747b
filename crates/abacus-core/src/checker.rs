//! Semantic checking.
//!
//! The checker resolves every variable and function, computes the type of
//! every node, and annotates the tree. It stops at the first error.

use crate::context::Context;
use crate::error::{CompileError, TypeError, TypeErrorKind};
use crate::symbols::SymbolTable;
use rhizome_abacus_ir::{BinaryOp, Node, NodeKind, Span, Type, UnaryOp, WideningPolicy};
use tracing::debug;

pub struct SemanticChecker<'a> {
    symbols: &'a SymbolTable,
    context: &'a Context,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(symbols: &'a SymbolTable, context: &'a Context) -> Self {
        Self { symbols, context }
    }

    /// Annotates `node` and every node below it. On error the tree is
    /// dropped, so a partially annotated tree is never observable.
    pub fn check(&self, node: Node) -> Result<Node, CompileError> {
        self.check_typed(node).map(|(node, _)| node)
    }

    /// Like [`check`](Self::check), also returning the expression's type.
    pub fn check_typed(&self, mut node: Node) -> Result<(Node, Type), CompileError> {
        let ty = self.visit(&mut node)?;
        debug!(%ty, nodes = node.size(), "checked expression");
        Ok((node, ty))
    }

    fn visit(&self, node: &mut Node) -> Result<Type, CompileError> {
        let span = node.span;
        let type_error = |kind: TypeErrorKind| CompileError::Type(TypeError::new(kind, span));
        let widening = self.context.widening();

        let ty = match &mut node.kind {
            NodeKind::Literal { value } => value.ty(),
            NodeKind::Variable { name } => self.variable_type(name, span)?,
            NodeKind::Unary { op, operand } => {
                let operand = self.visit(operand)?;
                match op {
                    UnaryOp::Negate if operand.is_numeric() => operand,
                    UnaryOp::Not if operand == Type::Boolean => Type::Boolean,
                    _ => {
                        return Err(type_error(TypeErrorKind::InvalidOperand { op: *op, operand }));
                    }
                }
            }
            NodeKind::Binary { op, left, right } => {
                let op = *op;
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                binary_type(op, left, right, widening).ok_or_else(|| {
                    type_error(TypeErrorKind::InvalidOperands { op, left, right })
                })?
            }
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let actual = self.visit(condition)?;
                if actual != Type::Boolean {
                    return Err(CompileError::Type(TypeError::new(
                        TypeErrorKind::Condition { actual },
                        condition.span,
                    )));
                }
                let then_type = self.visit(then_branch)?;
                let else_type = self.visit(else_branch)?;
                widening.unify(then_type, else_type).ok_or_else(|| {
                    type_error(TypeErrorKind::BranchMismatch {
                        then_type,
                        else_type,
                    })
                })?
            }
            NodeKind::Call { name, args } => {
                let function = self.context.functions.get(name).ok_or_else(|| {
                    CompileError::UnknownFunction {
                        name: name.clone(),
                        span,
                    }
                })?;
                let types = args
                    .iter_mut()
                    .map(|arg| self.visit(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                function.resolve(&types, widening).map_err(type_error)?.returns
            }
            NodeKind::Assignment { name, value } => {
                let expected = self.variable_type(name, span)?;
                let actual = self.visit(value)?;
                if !widening.widens(actual, expected) {
                    return Err(type_error(TypeErrorKind::Assignment {
                        name: name.clone(),
                        expected,
                        actual,
                    }));
                }
                expected
            }
        };

        node.annotate(ty);
        Ok(ty)
    }

    fn variable_type(&self, name: &str, span: Span) -> Result<Type, CompileError> {
        self.symbols
            .lookup(name)
            .map(|symbol| symbol.ty)
            .map_err(|_| CompileError::UnknownVariable {
                name: name.to_string(),
                span,
            })
    }
}

/// The result type of a binary operator, or `None` if the operands are not
/// acceptable.
pub fn binary_type(
    op: BinaryOp,
    left: Type,
    right: Type,
    widening: &WideningPolicy,
) -> Option<Type> {
    if op.is_logical() {
        return (left == Type::Boolean && right == Type::Boolean).then_some(Type::Boolean);
    }
    let operand = widening.unify(left, right)?;
    if op.is_arithmetic() {
        (operand.is_numeric() || (op == BinaryOp::Add && operand == Type::String)).then_some(operand)
    } else if op.is_relational() {
        operand.is_ordered().then_some(Type::Boolean)
    } else {
        Some(Type::Boolean)
    }
}
