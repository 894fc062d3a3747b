//! Compile-time errors.

use rhizome_abacus_ir::{BinaryOp, Span, Type, UnaryOp};
use rhizome_abacus_syntax::{LexError, ParseError, SyntaxError};
use thiserror::Error;

/// What went wrong while typing an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeErrorKind {
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },

    #[error("operator '{op}' cannot be applied to {operand}")]
    InvalidOperand { op: UnaryOp, operand: Type },

    #[error("condition must be BOOLEAN, found {actual}")]
    Condition { actual: Type },

    #[error("branches have incompatible types {then_type} and {else_type}")]
    BranchMismatch { then_type: Type, else_type: Type },

    #[error("cannot assign {actual} to variable '{name}' of type {expected}")]
    Assignment {
        name: String,
        expected: Type,
        actual: Type,
    },

    #[error("function '{function}' expects {expected} argument(s), found {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("argument {position} of '{function}' expects {expected}, found {actual}")]
    Argument {
        function: String,
        position: usize,
        expected: Type,
        actual: Type,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("type error at {span}: {kind}")]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Any error that aborts a compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unknown variable '{name}' at {span}")]
    UnknownVariable { name: String, span: Span },

    #[error("unknown function '{name}' at {span}")]
    UnknownFunction { name: String, span: Span },

    #[error(transparent)]
    Type(#[from] TypeError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(err) => err.span(),
            CompileError::Parse(err) => err.span(),
            CompileError::UnknownVariable { span, .. }
            | CompileError::UnknownFunction { span, .. } => *span,
            CompileError::Type(err) => err.span,
        }
    }
}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lex(err) => CompileError::Lex(err),
            SyntaxError::Parse(err) => CompileError::Parse(err),
        }
    }
}
