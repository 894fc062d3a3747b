//! Operator-precedence parser.
//!
//! Precedence, lowest to highest:
//!
//! | level | operators | associativity |
//! |---|---|---|
//! | assignment | `=` | right |
//! | ternary | `? :` | right |
//! | logical or | `or` `\|\|` | left |
//! | logical and | `and` `&&` | left |
//! | equality | `==` `!=` | left |
//! | relational | `<` `<=` `>` `>=` | left |
//! | additive | `+` `-` | left |
//! | multiplicative | `*` `/` `%` | left |
//! | unary | `-` `not` `!` | prefix |

use crate::lexer::{LexError, Lexer};
use crate::token::{Token, TokenKind};
use rhizome_abacus_ir::{BinaryOp, NodeFactory, Span, UnaryOp};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::trace;

/// Default limit on expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected {found} at {span}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    #[error("unclosed '(' at {open}, found {found} at {span}")]
    UnclosedParenthesis {
        open: Span,
        found: String,
        span: Span,
    },

    #[error("unmatched ')' at {span}")]
    UnmatchedParenthesis { span: Span },

    #[error("unexpected trailing input {found} at {span}")]
    TrailingInput { found: String, span: Span },

    #[error("invalid assignment target at {span}, only variables can be assigned")]
    InvalidAssignmentTarget { span: Span },

    #[error("expression nested too deeply at {span} (limit {limit})")]
    TooDeep { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnclosedParenthesis { span, .. }
            | ParseError::UnmatchedParenthesis { span }
            | ParseError::TrailingInput { span, .. }
            | ParseError::InvalidAssignmentTarget { span }
            | ParseError::TooDeep { span, .. } => *span,
        }
    }
}

/// Either stage of turning text into a tree can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(err) => err.span(),
            SyntaxError::Parse(err) => err.span(),
        }
    }
}

type Result<T> = std::result::Result<T, SyntaxError>;

/// A parsed subtree with the bookkeeping the grammar needs.
struct Parsed<N> {
    node: N,
    span: Span,
    height: usize,
}

fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOp::Or, 1),
        TokenKind::And => (BinaryOp::And, 2),
        TokenKind::EqualEqual => (BinaryOp::Equal, 3),
        TokenKind::BangEqual => (BinaryOp::NotEqual, 3),
        TokenKind::Less => (BinaryOp::Less, 4),
        TokenKind::LessEqual => (BinaryOp::LessEqual, 4),
        TokenKind::Greater => (BinaryOp::Greater, 4),
        TokenKind::GreaterEqual => (BinaryOp::GreaterEqual, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Subtract, 5),
        TokenKind::Star => (BinaryOp::Multiply, 6),
        TokenKind::Slash => (BinaryOp::Divide, 6),
        TokenKind::Percent => (BinaryOp::Modulo, 6),
        _ => return None,
    };
    Some(entry)
}

/// Parses one expression, building nodes through a [`NodeFactory`].
pub struct Parser<'a, F: NodeFactory> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Token>,
    factory: F,
    depth: usize,
    max_depth: usize,
}

impl<'a, F: NodeFactory> Parser<'a, F> {
    pub fn new(source: &'a str, factory: F) -> Self {
        Self::with_max_depth(source, factory, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(source: &'a str, factory: F, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            factory,
            depth: 0,
            max_depth,
        }
    }

    /// Parses the whole source as a single expression.
    pub fn parse(mut self) -> Result<F::Node> {
        let parsed = self.parse_assignment()?;

        let token = self.advance()?;
        match token.kind {
            TokenKind::Eof => {}
            TokenKind::RightParen => {
                return Err(ParseError::UnmatchedParenthesis { span: token.span }.into());
            }
            _ => {
                return Err(ParseError::TrailingInput {
                    found: token.to_string(),
                    span: token.span,
                }
                .into());
            }
        }

        trace!(height = parsed.height, "parsed expression");
        Ok(parsed.node)
    }

    fn fill(&mut self, n: usize) -> Result<()> {
        while self.lookahead.len() <= n {
            let token = match self.lexer.next() {
                Some(token) => token?,
                None => self.eof_token(),
            };
            self.lookahead.push_back(token);
        }
        Ok(())
    }

    fn eof_token(&self) -> Token {
        let end = self.lexer.source().len();
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::new(end, end),
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&mut self, n: usize) -> Result<&Token> {
        self.fill(n)?;
        Ok(&self.lookahead[n])
    }

    fn advance(&mut self) -> Result<Token> {
        self.fill(0)?;
        let token = self.lookahead.pop_front();
        Ok(token.unwrap_or_else(|| self.eof_token()))
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(&self.peek()?.kind == kind)
    }

    fn unexpected(token: &Token, expected: &str) -> SyntaxError {
        ParseError::UnexpectedToken {
            found: token.to_string(),
            expected: expected.to_string(),
            span: token.span,
        }
        .into()
    }

    /// Runs `f` one recursion level deeper, failing once the limit is hit.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            let span = self.peek()?.span;
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                span,
            }
            .into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn check_height(&self, height: usize, span: Span) -> Result<usize> {
        if height > self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                span,
            }
            .into());
        }
        Ok(height)
    }

    fn parse_assignment(&mut self) -> Result<Parsed<F::Node>> {
        self.nested(|parser| {
            let is_assignment = parser.peek()?.kind == TokenKind::Identifier
                && parser.peek_nth(1)?.kind == TokenKind::Assign;

            if !is_assignment {
                let parsed = parser.parse_ternary()?;
                if parser.check(&TokenKind::Assign)? {
                    return Err(ParseError::InvalidAssignmentTarget { span: parsed.span }.into());
                }
                return Ok(parsed);
            }

            let target = parser.advance()?;
            parser.advance()?;
            let value = parser.parse_assignment()?;
            let span = target.span.to(value.span);
            let height = parser.check_height(value.height + 1, span)?;
            let node = parser.factory.assignment(target.text, value.node, span);
            Ok(Parsed { node, span, height })
        })
    }

    fn parse_ternary(&mut self) -> Result<Parsed<F::Node>> {
        let condition = self.parse_binary(1)?;
        if !self.check(&TokenKind::Question)? {
            return Ok(condition);
        }
        self.advance()?;

        let then_branch = self.parse_assignment()?;
        let token = self.advance()?;
        if token.kind != TokenKind::Colon {
            return Err(Self::unexpected(&token, "':'"));
        }
        let else_branch = self.nested(|parser| parser.parse_ternary())?;

        let span = condition.span.to(else_branch.span);
        let height = condition
            .height
            .max(then_branch.height)
            .max(else_branch.height)
            + 1;
        let height = self.check_height(height, span)?;
        let node = self
            .factory
            .ternary(condition.node, then_branch.node, else_branch.node, span);
        Ok(Parsed { node, span, height })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Parsed<F::Node>> {
        let mut left = self.parse_unary()?;

        loop {
            let Some((op, precedence)) = binary_op(&self.peek()?.kind) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance()?;

            let right = self.parse_binary(precedence + 1)?;
            let span = left.span.to(right.span);
            let height = self.check_height(left.height.max(right.height) + 1, span)?;
            let node = self.factory.binary(op, left.node, right.node, span);
            left = Parsed { node, span, height };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Parsed<F::Node>> {
        let op = match self.peek()?.kind {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let token = self.advance()?;

        self.nested(|parser| {
            let operand = parser.parse_unary()?;
            let span = token.span.to(operand.span);
            let height = parser.check_height(operand.height + 1, span)?;
            let node = parser.factory.unary(op, operand.node, span);
            Ok(Parsed { node, span, height })
        })
    }

    fn parse_primary(&mut self) -> Result<Parsed<F::Node>> {
        let token = self.advance()?;

        match token.kind {
            TokenKind::Literal(value) => {
                let node = self.factory.literal(value, token.span);
                Ok(Parsed {
                    node,
                    span: token.span,
                    height: 1,
                })
            }
            TokenKind::Identifier => {
                if self.check(&TokenKind::LeftParen)? {
                    return self.parse_call(token);
                }
                let node = self.factory.variable(token.text, token.span);
                Ok(Parsed {
                    node,
                    span: token.span,
                    height: 1,
                })
            }
            TokenKind::LeftParen => {
                let inner = self.parse_assignment()?;
                let close = self.expect_close(token.span)?;
                Ok(Parsed {
                    node: inner.node,
                    span: token.span.to(close),
                    height: inner.height,
                })
            }
            TokenKind::RightParen => Err(ParseError::UnmatchedParenthesis { span: token.span }.into()),
            _ => Err(Self::unexpected(&token, "expression")),
        }
    }

    fn parse_call(&mut self, name: Token) -> Result<Parsed<F::Node>> {
        let open = self.advance()?.span;
        let mut args = Vec::new();
        let mut height = 1;

        if !self.check(&TokenKind::RightParen)? {
            loop {
                let arg = self.parse_assignment()?;
                height = height.max(arg.height + 1);
                args.push(arg.node);

                if !self.check(&TokenKind::Comma)? {
                    break;
                }
                self.advance()?;
            }
        }

        let close = self.expect_close(open)?;
        let span = name.span.to(close);
        let height = self.check_height(height, span)?;
        let node = self.factory.call(name.text, args, span);
        Ok(Parsed { node, span, height })
    }

    fn expect_close(&mut self, open: Span) -> Result<Span> {
        let token = self.advance()?;
        if token.kind == TokenKind::RightParen {
            Ok(token.span)
        } else {
            Err(ParseError::UnclosedParenthesis {
                open,
                found: token.to_string(),
                span: token.span,
            }
            .into())
        }
    }
}
