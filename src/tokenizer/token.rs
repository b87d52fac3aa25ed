//! Tokens, the lexeme under construction, and lexical errors.

use super::cursor::{Cursor, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a finished token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Decimal,
    Hex,
    Octal,
    Binary,
    String,
    Operator,
    Symbol,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decimal => "decimal literal",
            Self::Hex => "hex literal",
            Self::Octal => "octal literal",
            Self::Binary => "binary literal",
            Self::String => "string",
            Self::Operator => "operator",
            Self::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

/// Interpreted value of a numeric literal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

/// A completed token.
///
/// `text` is the lexeme exactly as it appears in the source, including any
/// `0x`/`0b` marker and string quotes. `digits_start` is the byte index in
/// `text` where the value digits begin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub digits_start: usize,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Token {
    /// The digits of a numeric literal, without a base marker.
    pub fn digits(&self) -> &str {
        self.text.get(self.digits_start..).unwrap_or_default()
    }

    /// Numeric interpretation of the literal, if it is one and fits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fsm_relay::tokenizer::{NumericValue, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new().unwrap();
    /// let tokens = tokenizer.tokenize("0x38afe 017 2.5e1").unwrap();
    /// let values: Vec<_> = tokens.iter().filter_map(|t| t.value()).collect();
    ///
    /// assert_eq!(
    ///     values,
    ///     vec![
    ///         NumericValue::Integer(232446),
    ///         NumericValue::Integer(15),
    ///         NumericValue::Float(25.0),
    ///     ]
    /// );
    /// ```
    pub fn value(&self) -> Option<NumericValue> {
        let digits = self.digits();
        match self.kind {
            TokenKind::Hex => i64::from_str_radix(digits, 16).ok().map(NumericValue::Integer),
            TokenKind::Octal => i64::from_str_radix(digits, 8).ok().map(NumericValue::Integer),
            TokenKind::Binary => i64::from_str_radix(digits, 2).ok().map(NumericValue::Integer),
            TokenKind::Decimal if digits.contains(['.', 'e', 'E']) => {
                digits.parse().ok().map(NumericValue::Float)
            }
            TokenKind::Decimal => digits.parse().ok().map(NumericValue::Integer),
            _ => None,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` at {}:{}", self.kind, self.text, self.line, self.column)
    }
}

/// An invalid character or malformed literal.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (line {line}, column {column})")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl LexError {
    /// `ch` was found at `at` where it cannot continue or follow a token.
    pub(crate) fn invalid_character(cursor: &Cursor, ch: char) -> Self {
        let at = cursor.position();
        Self {
            message: format!(
                "invalid character '{ch}' in \"{}\" at position {}",
                cursor.source(),
                at.offset
            ),
            line: at.line,
            column: at.column,
            offset: at.offset,
        }
    }
}

/// The token being built: a cursor plus where the token started.
#[derive(Clone, Debug)]
pub struct Lexeme {
    cursor: Cursor,
    start: Position,
    digits_start: usize,
    kind: TokenKind,
}

impl Lexeme {
    /// An empty lexeme starting at the cursor.
    pub(crate) fn at(cursor: Cursor) -> Self {
        let start = cursor.position();
        Self {
            cursor,
            start,
            digits_start: 0,
            kind: TokenKind::Symbol,
        }
    }

    pub fn text(&self) -> &str {
        self.cursor.slice_from(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.position().offset == self.start.offset
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub(crate) fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub(crate) fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.cursor.peek()
    }

    pub(crate) fn first_char(&self) -> Option<char> {
        self.text().chars().next()
    }

    pub(crate) fn last_char(&self) -> Option<char> {
        self.text().chars().next_back()
    }

    /// Take the next character into the token.
    pub(crate) fn extend(&mut self) {
        self.cursor.advance();
    }

    /// The token as it would read after [`extend`](Self::extend).
    pub(crate) fn peek_extended(&self) -> Option<&str> {
        let ch = self.cursor.peek()?;
        let end = self.cursor.position().offset + ch.len_utf8();
        self.cursor.source().get(self.start.offset..end)
    }

    /// Take a base marker into the token; the value digits start after it.
    pub(crate) fn skip_marker(&mut self) {
        self.cursor.advance();
        self.digits_start = self.text().len();
    }

    /// Consume one character that belongs to no token and start afresh.
    pub(crate) fn skip(&mut self) {
        self.cursor.advance();
        *self = Self::at(self.cursor.clone());
    }

    pub(crate) fn to_token(&self) -> Token {
        Token {
            kind: self.kind,
            text: self.text().to_string(),
            digits_start: self.digits_start,
            line: self.start.line,
            column: self.start.column,
            offset: self.start.offset,
        }
    }
}
