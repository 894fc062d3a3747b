//! Types, values and expression trees for Abacus.
//!
//! This crate defines the data model shared by the syntax frontend, the
//! semantic passes and the translator backends:
//!
//! - [`Type`] and [`Value`]: the closed set of value kinds
//! - [`Node`]: the expression tree, annotated with a [`Type`] once checked
//! - [`NodeFactory`]: the construction interface the parser builds through,
//!   so the same grammar can produce other tree representations
//!
//! Example:
//! ```
//! use rhizome_abacus_ir::{AbacusNodeFactory, BinaryOp, NodeFactory, Span, Value};
//!
//! let mut factory = AbacusNodeFactory;
//! let one = factory.literal(Value::Integer(1), Span::new(0, 1));
//! let two = factory.literal(Value::Integer(2), Span::new(4, 5));
//! let sum = factory.binary(BinaryOp::Add, one, two, Span::new(0, 5));
//! assert!(sum.ty().is_none());
//! ```

mod date;
mod factory;
mod node;
pub mod sexpr;
mod span;
mod types;
mod value;

pub use date::{Date, DateError};
pub use factory::{AbacusNodeFactory, NodeFactory};
pub use node::{BinaryOp, Node, NodeKind, UnaryOp};
pub use span::Span;
pub use types::{Type, WideningPolicy, WideningRule};
pub use value::{Value, ValueError};

#[cfg(test)]
mod tests;
