//! Tokens produced by the lexer.

use rhizome_abacus_ir::{Span, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A numeric, string, boolean or date literal, already decoded.
    Literal(Value),
    Identifier,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// `and` or `&&`
    And,
    /// `or` or `||`
    Or,
    /// `not` or `!`
    Not,
    Question,
    Colon,
    Assign,

    // Punctuation
    LeftParen,
    RightParen,
    Comma,

    Eof,
}

impl TokenKind {
    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Literal(_) => "literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::EqualEqual => "'=='",
            TokenKind::BangEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Assign => "'='",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token with its raw source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            f.write_str("end of input")
        } else {
            write!(f, "'{}'", self.text)
        }
    }
}
