//! Node construction interface used by the parser.

use crate::{BinaryOp, Node, NodeKind, Span, UnaryOp, Value};

/// Builds tree nodes on behalf of the parser.
///
/// The parser only knows the grammar; the factory decides what a tree looks
/// like. Implement this trait to parse Abacus into another representation.
pub trait NodeFactory {
    type Node;

    fn literal(&mut self, value: Value, span: Span) -> Self::Node;

    fn variable(&mut self, name: String, span: Span) -> Self::Node;

    fn unary(&mut self, op: UnaryOp, operand: Self::Node, span: Span) -> Self::Node;

    fn binary(&mut self, op: BinaryOp, left: Self::Node, right: Self::Node, span: Span)
    -> Self::Node;

    fn ternary(
        &mut self,
        condition: Self::Node,
        then_branch: Self::Node,
        else_branch: Self::Node,
        span: Span,
    ) -> Self::Node;

    fn call(&mut self, name: String, args: Vec<Self::Node>, span: Span) -> Self::Node;

    fn assignment(&mut self, name: String, value: Self::Node, span: Span) -> Self::Node;
}

/// Builds untyped [`Node`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbacusNodeFactory;

impl NodeFactory for AbacusNodeFactory {
    type Node = Node;

    fn literal(&mut self, value: Value, span: Span) -> Node {
        Node::new(NodeKind::Literal { value }, span)
    }

    fn variable(&mut self, name: String, span: Span) -> Node {
        Node::new(NodeKind::Variable { name }, span)
    }

    fn unary(&mut self, op: UnaryOp, operand: Node, span: Span) -> Node {
        Node::new(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn binary(&mut self, op: BinaryOp, left: Node, right: Node, span: Span) -> Node {
        Node::new(
            NodeKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn ternary(&mut self, condition: Node, then_branch: Node, else_branch: Node, span: Span) -> Node {
        Node::new(
            NodeKind::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        )
    }

    fn call(&mut self, name: String, args: Vec<Node>, span: Span) -> Node {
        Node::new(NodeKind::Call { name, args }, span)
    }

    fn assignment(&mut self, name: String, value: Node, span: Span) -> Node {
        Node::new(
            NodeKind::Assignment {
                name,
                value: Box::new(value),
            },
            span,
        )
    }
}
