//! Constant folding over checked trees.
//!
//! Folding evaluates constant subtrees with the reference [`Evaluator`], so a
//! folded literal is exactly what the expression would produce at runtime.
//! A subtree whose evaluation fails is left in place for the runtime to
//! report. Variables and assignments are never removed.

use crate::context::Context;
use crate::interpreter::Evaluator;
use crate::symbols::SymbolTable;
use rhizome_abacus_ir::{BinaryOp, Node, NodeKind, Span, Type, Value};
use tracing::{debug, trace};

pub struct Simplifier<'a> {
    context: &'a Context,
}

impl<'a> Simplifier<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    /// Simplifies a checked tree. Types are preserved; applying the
    /// simplifier to its own output returns it unchanged.
    pub fn simplify(&self, node: Node) -> Node {
        let before = node.size();
        let node = self.visit(node);
        debug!(before, after = node.size(), "simplified expression");
        node
    }

    fn visit(&self, node: Node) -> Node {
        let ty = node.ty();
        let span = node.span;
        let kind = match node.kind {
            NodeKind::Unary { op, operand } => NodeKind::Unary {
                op,
                operand: self.visit_boxed(operand),
            },
            NodeKind::Binary { op, left, right } => NodeKind::Binary {
                op,
                left: self.visit_boxed(left),
                right: self.visit_boxed(right),
            },
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => NodeKind::Ternary {
                condition: self.visit_boxed(condition),
                then_branch: self.visit_boxed(then_branch),
                else_branch: self.visit_boxed(else_branch),
            },
            NodeKind::Call { name, args } => NodeKind::Call {
                name,
                args: args.into_iter().map(|arg| self.visit(arg)).collect(),
            },
            NodeKind::Assignment { name, value } => NodeKind::Assignment {
                name,
                value: self.visit_boxed(value),
            },
            leaf => leaf,
        };
        self.reduce(kind, span, ty)
    }

    fn visit_boxed(&self, node: Box<Node>) -> Box<Node> {
        Box::new(self.visit(*node))
    }

    /// Rewrites a node whose children are already simplified.
    fn reduce(&self, kind: NodeKind, span: Span, ty: Option<Type>) -> Node {
        match kind {
            NodeKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => self.logical(op, left, right, span, ty),
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => self.ternary(condition, then_branch, else_branch, span, ty),
            kind => {
                let node = rebuild(kind, span, ty);
                if self.foldable(&node) {
                    self.fold(node)
                } else {
                    node
                }
            }
        }
    }

    fn foldable(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Unary { operand, .. } => operand.is_literal(),
            NodeKind::Binary { left, right, .. } => left.is_literal() && right.is_literal(),
            NodeKind::Call { name, args } => {
                self.context.functions.is_pure(name) && args.iter().all(Node::is_literal)
            }
            _ => false,
        }
    }

    fn fold(&self, node: Node) -> Node {
        let mut scratch = SymbolTable::new();
        match Evaluator::new(self.context, &mut scratch).evaluate(&node) {
            Ok(value) if Some(value.ty()) == node.ty() => Node::typed_literal(value, node.span),
            Ok(_) => node,
            Err(err) => {
                trace!(span = %node.span, %err, "left unfolded");
                node
            }
        }
    }

    /// Short-circuit rules. A constant that decides the result replaces the
    /// whole operation; a neutral constant is dropped.
    fn logical(&self, op: BinaryOp, left: Box<Node>, right: Box<Node>, span: Span, ty: Option<Type>) -> Node {
        // `true` decides `||`, `false` decides `&&`.
        let deciding = op == BinaryOp::Or;
        let lhs = left.as_literal().and_then(Value::as_bool);
        let rhs = right.as_literal().and_then(Value::as_bool);
        match (lhs, rhs) {
            (Some(l), _) if l == deciding => Node::typed_literal(Value::Boolean(deciding), span),
            (Some(_), _) => *right,
            (None, Some(r)) if r != deciding => *left,
            _ => rebuild(NodeKind::Binary { op, left, right }, span, ty),
        }
    }

    /// A constant condition selects its branch. A literal branch is
    /// converted to the ternary's type; a non-literal branch of a narrower
    /// type keeps the ternary in place.
    fn ternary(
        &self,
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
        span: Span,
        ty: Option<Type>,
    ) -> Node {
        if let Some(take_then) = condition.as_literal().and_then(Value::as_bool) {
            let chosen = if take_then { &then_branch } else { &else_branch };
            if chosen.ty() == ty {
                return if take_then { *then_branch } else { *else_branch };
            }
            let converted = chosen
                .as_literal()
                .zip(ty)
                .and_then(|(value, ty)| value.convert(ty));
            if let Some(value) = converted {
                return Node::typed_literal(value, chosen.span);
            }
        }
        rebuild(
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            },
            span,
            ty,
        )
    }
}

fn rebuild(kind: NodeKind, span: Span, ty: Option<Type>) -> Node {
    let mut node = Node::new(kind, span);
    if let Some(ty) = ty {
        node.annotate(ty);
    }
    node
}
