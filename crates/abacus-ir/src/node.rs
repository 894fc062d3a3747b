//! Expression trees.

use crate::{Span, Type, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeKind {
    Literal {
        value: Value,
    },
    Variable {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Ternary {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
}

/// One node of an expression tree.
///
/// A node owns its children. Its type is absent until the semantic checker
/// annotates it, after which it stays fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    ty: Option<Type>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    /// A literal that is already annotated with its value's type.
    pub fn typed_literal(value: Value, span: Span) -> Self {
        let ty = value.ty();
        Self {
            kind: NodeKind::Literal { value },
            span,
            ty: Some(ty),
        }
    }

    pub fn ty(&self) -> Option<Type> {
        self.ty
    }

    /// Records the resolved type. Annotating a node twice is a checker bug.
    pub fn annotate(&mut self, ty: Type) {
        debug_assert!(
            self.ty.is_none_or(|existing| existing == ty),
            "node at {} annotated twice",
            self.span
        );
        self.ty = Some(ty);
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// Whether every node of the tree carries a type.
    pub fn is_fully_typed(&self) -> bool {
        self.ty.is_some() && self.children().all(Node::is_fully_typed)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().map(Node::size).sum::<usize>()
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let children: Vec<&Node> = match &self.kind {
            NodeKind::Literal { .. } | NodeKind::Variable { .. } => Vec::new(),
            NodeKind::Unary { operand, .. } => vec![operand],
            NodeKind::Binary { left, right, .. } => vec![left, right],
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => vec![condition, then_branch, else_branch],
            NodeKind::Call { args, .. } => args.iter().collect(),
            NodeKind::Assignment { value, .. } => vec![value],
        };
        children.into_iter()
    }
}
