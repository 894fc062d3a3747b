//! Lazy tokenizer for Abacus expressions.

use crate::token::{Token, TokenKind};
use rhizome_abacus_ir::{Date, Span, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string literal at {span}")]
    UnterminatedString { span: Span },

    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    #[error("unterminated date literal at {span}")]
    UnterminatedDate { span: Span },

    #[error("invalid escape sequence '\\{escape}' at {span}")]
    InvalidEscape { escape: char, span: Span },

    #[error("invalid number '{text}' at {span}")]
    InvalidNumber { text: String, span: Span },

    #[error("invalid date '{text}' at {span}: {reason}")]
    InvalidDate {
        text: String,
        reason: String,
        span: Span,
    },

    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedCharacter { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::UnterminatedDate { span }
            | LexError::InvalidEscape { span, .. }
            | LexError::InvalidNumber { span, .. }
            | LexError::InvalidDate { span, .. }
            | LexError::UnexpectedCharacter { span, .. } => *span,
        }
    }
}

/// Produces tokens on demand, ending with a single [`TokenKind::Eof`].
///
/// The iterator stops after the end marker or the first error. Call
/// [`Lexer::restart`] to tokenize the source again from the beginning.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            finished: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn restart(&mut self) {
        self.pos = 0;
        self.finished = false;
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        }
    }

    /// Skips whitespace and `/* ... */` comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.source[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => {
                            self.pos = self.source.len();
                            return Err(LexError::UnterminatedComment {
                                span: Span::new(start, self.pos),
                            });
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            '=' if self.eat('=') => TokenKind::EqualEqual,
            '=' => TokenKind::Assign,
            '!' if self.eat('=') => TokenKind::BangEqual,
            '!' => TokenKind::Not,
            '<' if self.eat('=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.eat('=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            '&' if self.eat('&') => TokenKind::And,
            '|' if self.eat('|') => TokenKind::Or,
            '\'' | '"' => return self.string(c, start),
            '#' => return self.date(start),
            c if c.is_ascii_digit() => return self.number(start),
            c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.word(start)),
            ch => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    span: Span::new(start, self.pos),
                });
            }
        };

        Ok(self.token(kind, start))
    }

    fn word(&mut self, start: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }

        let kind = match &self.source[start..self.pos] {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "true" => TokenKind::Literal(Value::Boolean(true)),
            "false" => TokenKind::Literal(Value::Boolean(false)),
            _ => TokenKind::Identifier,
        };
        self.token(kind, start)
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn number(&mut self, start: usize) -> Result<Token, LexError> {
        self.digits();
        let mut is_decimal = false;

        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.bump();
            self.digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_decimal = true;
                self.digits();
            } else {
                self.pos = mark;
            }
        }

        // `12abc` is a malformed number, not a number followed by a name.
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }

        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);
        let invalid = || LexError::InvalidNumber {
            text: text.to_string(),
            span,
        };

        let value = if is_decimal {
            let n: f64 = text.parse().map_err(|_| invalid())?;
            if !n.is_finite() {
                return Err(invalid());
            }
            Value::Decimal(n)
        } else {
            Value::Integer(text.parse().map_err(|_| invalid())?)
        };

        Ok(self.token(TokenKind::Literal(value), start))
    }

    fn string(&mut self, quote: char, start: usize) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LexError::UnterminatedString {
                    span: Span::new(start, self.pos),
                });
            };
            match c {
                c if c == quote => break,
                '\\' => {
                    let escape_start = self.pos - 1;
                    let Some(escape) = self.bump() else {
                        return Err(LexError::UnterminatedString {
                            span: Span::new(start, self.pos),
                        });
                    };
                    value.push(match escape {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        '\\' | '\'' | '"' => escape,
                        _ => {
                            return Err(LexError::InvalidEscape {
                                escape,
                                span: Span::new(escape_start, self.pos),
                            });
                        }
                    });
                }
                c => value.push(c),
            }
        }
        Ok(self.token(TokenKind::Literal(Value::String(value)), start))
    }

    fn date(&mut self, start: usize) -> Result<Token, LexError> {
        let Some(len) = self.source[self.pos..].find('#') else {
            self.pos = self.source.len();
            return Err(LexError::UnterminatedDate {
                span: Span::new(start, self.pos),
            });
        };
        let text = &self.source[self.pos..self.pos + len];
        self.pos += len + 1;

        let date: Date = text.parse().map_err(|err: rhizome_abacus_ir::DateError| {
            LexError::InvalidDate {
                text: text.to_string(),
                reason: err.to_string(),
                span: Span::new(start, self.pos),
            }
        })?;
        Ok(self.token(TokenKind::Literal(Value::Date(date)), start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if result.as_ref().map_or(true, Token::is_eof) {
            self.finished = true;
        }
        Some(result)
    }
}

/// Tokenizes the whole source eagerly.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
