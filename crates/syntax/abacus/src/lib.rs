//! Lexer and parser for Abacus expressions.
//!
//! The lexer turns source text into a lazy stream of tokens; the parser
//! consumes it with operator-precedence descent and builds a tree through a
//! [`NodeFactory`].

mod lexer;
mod parser;
mod token;

pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{DEFAULT_MAX_DEPTH, ParseError, Parser, SyntaxError};
pub use token::{Token, TokenKind};

use rhizome_abacus_ir::{AbacusNodeFactory, Node, NodeFactory};

/// Parse an expression into an untyped [`Node`] tree.
pub fn parse(source: &str) -> Result<Node, SyntaxError> {
    Parser::new(source, AbacusNodeFactory).parse()
}

/// Parse an expression with a custom factory and nesting limit.
pub fn parse_with<F: NodeFactory>(
    source: &str,
    factory: F,
    max_depth: usize,
) -> Result<F::Node, SyntaxError> {
    Parser::with_max_depth(source, factory, max_depth).parse()
}

#[cfg(test)]
mod tests;
