//! Tokenizer states and the classification work done in their hooks.

use super::cursor::Cursor;
use super::events::TokenizerEvent;
use super::machine::TokenizerMachine;
use super::observer::TokenRelay;
use super::token::{LexError, Lexeme, TokenKind};
use crate::core::State;
use crate::engine::Context;
use crate::lexical::Grammar;
use std::convert::Infallible;
use tracing::{debug, trace};

type Cx<'a, G, R> = Context<'a, TokenizerMachine<G, R>>;

/// States of the tokenizer machine.
///
/// Every `In*` state holds the token under construction. On entry it either
/// takes one more character and emits `ContinueToken` (which re-enters the
/// same state) or emits `EndToken`.
#[derive(Debug)]
pub enum TokenizerState {
    Initialised,
    Parse(Cursor),
    NewToken(Lexeme),
    InNumeric(Lexeme),
    InNumericBase(Lexeme),
    InDecimal(Lexeme),
    InExponent(Lexeme),
    InHex(Lexeme),
    InOctal(Lexeme),
    InBinary(Lexeme),
    InString(Lexeme),
    InOperator(Lexeme),
    InSymbol(Lexeme),
    TokenComplete(Lexeme),
    Error(LexError),
}

impl TokenizerState {
    /// Whether `ContinueToken` applies to this state.
    pub fn is_in_token(&self) -> bool {
        matches!(
            self,
            Self::InNumeric(_)
                | Self::InNumericBase(_)
                | Self::InDecimal(_)
                | Self::InExponent(_)
                | Self::InHex(_)
                | Self::InOctal(_)
                | Self::InBinary(_)
                | Self::InString(_)
                | Self::InOperator(_)
                | Self::InSymbol(_)
        )
    }
}

impl<G: Grammar, R: TokenRelay> State<TokenizerMachine<G, R>> for TokenizerState {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialised => "Initialised",
            Self::Parse(_) => "Parse",
            Self::NewToken(_) => "NewToken",
            Self::InNumeric(_) => "InNumeric",
            Self::InNumericBase(_) => "InNumericBase",
            Self::InDecimal(_) => "InDecimal",
            Self::InExponent(_) => "InExponent",
            Self::InHex(_) => "InHex",
            Self::InOctal(_) => "InOctal",
            Self::InBinary(_) => "InBinary",
            Self::InString(_) => "InString",
            Self::InOperator(_) => "InOperator",
            Self::InSymbol(_) => "InSymbol",
            Self::TokenComplete(_) => "TokenComplete",
            Self::Error(_) => "Error",
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    fn enter(&mut self, cx: &mut Cx<'_, G, R>) -> Result<(), Infallible> {
        let grammar = cx.machine().grammar();
        match self {
            Self::Initialised => {}
            Self::Parse(cursor) => {
                trace!(len = cursor.source().len(), "parsing");
                cx.emit(TokenizerEvent::BeginToken(cursor.clone()));
            }
            Self::NewToken(lexeme) => new_token(grammar, lexeme, cx),
            Self::InNumeric(lexeme) => in_numeric(grammar, lexeme, cx),
            Self::InNumericBase(lexeme) => in_numeric_base(grammar, lexeme, cx),
            Self::InDecimal(lexeme) => in_decimal(grammar, lexeme, cx),
            Self::InExponent(lexeme) => {
                lexeme.set_kind(TokenKind::Decimal);
                let after_marker = matches!(lexeme.last_char(), Some('e' | 'E'));
                continue_while(lexeme, cx, |ch| {
                    (after_marker && matches!(ch, '+' | '-')) || grammar.is_digit(ch)
                });
            }
            Self::InHex(lexeme) => {
                lexeme.set_kind(TokenKind::Hex);
                continue_while(lexeme, cx, |ch| grammar.is_hex_digit(ch));
            }
            Self::InOctal(lexeme) => {
                lexeme.set_kind(TokenKind::Octal);
                continue_while(lexeme, cx, |ch| grammar.is_oct_digit(ch));
            }
            Self::InBinary(lexeme) => {
                lexeme.set_kind(TokenKind::Binary);
                continue_while(lexeme, cx, |ch| grammar.is_bin_digit(ch));
            }
            Self::InString(lexeme) => in_string(lexeme, cx),
            Self::InOperator(lexeme) => in_operator(grammar, lexeme, cx),
            Self::InSymbol(lexeme) => {
                lexeme.set_kind(TokenKind::Symbol);
                continue_while(lexeme, cx, |ch| grammar.is_symbol_char(ch));
            }
            Self::TokenComplete(lexeme) => token_complete(grammar, lexeme, cx),
            Self::Error(error) => {
                debug!(%error, "lexical error");
                cx.machine().report_error(error.clone());
                cx.emit(TokenizerEvent::Initialise);
            }
        }
        Ok(())
    }

    fn reenter(&mut self, cx: &mut Cx<'_, G, R>) -> Result<(), Infallible> {
        if matches!(self, Self::NewToken(_)) || self.is_in_token() {
            self.enter(cx)
        } else {
            Ok(())
        }
    }
}

/// Decide what kind of token starts at the next character.
fn new_token<G: Grammar, R: TokenRelay>(grammar: &G, lexeme: &mut Lexeme, cx: &mut Cx<'_, G, R>) {
    let Some(ch) = lexeme.peek() else {
        cx.emit(TokenizerEvent::EndToken(lexeme.clone()));
        return;
    };
    if grammar.is_space(ch) {
        lexeme.skip();
        cx.emit(TokenizerEvent::BeginToken(lexeme.cursor().clone()));
        return;
    }

    lexeme.extend();
    let next_is_digit = lexeme.peek().is_some_and(|next| grammar.is_digit(next));
    let started = lexeme.clone();
    let event = match ch {
        '.' if next_is_digit => TokenizerEvent::ToDecLiteral(started),
        '0' => TokenizerEvent::SeenLeadingZero(started),
        ch if grammar.is_digit(ch) => TokenizerEvent::SeenDigit(started),
        ch if grammar.is_operator_char(ch) => TokenizerEvent::SeenOperatorChar(started),
        ch if grammar.is_quote_char(ch) => TokenizerEvent::SeenQuote(started),
        _ => TokenizerEvent::SeenSymbolChar(started),
    };
    cx.emit(event);
}

/// Extend while `valid` accepts the next character, else end the token.
fn continue_while<G: Grammar, R: TokenRelay>(
    lexeme: &mut Lexeme,
    cx: &mut Cx<'_, G, R>,
    valid: impl Fn(char) -> bool,
) {
    if lexeme.peek().is_some_and(valid) {
        lexeme.extend();
        cx.emit(TokenizerEvent::ContinueToken(lexeme.clone()));
    } else {
        cx.emit(TokenizerEvent::EndToken(lexeme.clone()));
    }
}

fn in_numeric<G: Grammar, R: TokenRelay>(grammar: &G, lexeme: &mut Lexeme, cx: &mut Cx<'_, G, R>) {
    lexeme.set_kind(TokenKind::Decimal);
    match lexeme.peek() {
        Some('.') => {
            lexeme.extend();
            cx.emit(TokenizerEvent::ToDecLiteral(lexeme.clone()));
        }
        Some('e' | 'E') => {
            lexeme.extend();
            cx.emit(TokenizerEvent::SeenExponent(lexeme.clone()));
        }
        _ => continue_while(lexeme, cx, |ch| grammar.is_digit(ch)),
    }
}

/// After a leading `0`: pick the base, or end the token.
fn in_numeric_base<G: Grammar, R: TokenRelay>(
    grammar: &G,
    lexeme: &mut Lexeme,
    cx: &mut Cx<'_, G, R>,
) {
    lexeme.set_kind(TokenKind::Decimal);
    let event = match lexeme.peek() {
        Some('b' | 'B') => {
            lexeme.skip_marker();
            TokenizerEvent::ToBinLiteral(lexeme.clone())
        }
        Some('x' | 'X') => {
            lexeme.skip_marker();
            TokenizerEvent::ToHexLiteral(lexeme.clone())
        }
        Some('e' | 'E') => {
            lexeme.extend();
            TokenizerEvent::SeenExponent(lexeme.clone())
        }
        Some('.') => {
            lexeme.extend();
            TokenizerEvent::ToDecLiteral(lexeme.clone())
        }
        Some(ch) if grammar.is_oct_digit(ch) => TokenizerEvent::ToOctLiteral(lexeme.clone()),
        _ => TokenizerEvent::EndToken(lexeme.clone()),
    };
    cx.emit(event);
}

fn in_decimal<G: Grammar, R: TokenRelay>(grammar: &G, lexeme: &mut Lexeme, cx: &mut Cx<'_, G, R>) {
    lexeme.set_kind(TokenKind::Decimal);
    match lexeme.peek() {
        Some('e' | 'E') => {
            lexeme.extend();
            cx.emit(TokenizerEvent::SeenExponent(lexeme.clone()));
        }
        Some('.') => {
            let error = LexError::invalid_character(lexeme.cursor(), '.');
            cx.emit(TokenizerEvent::Error(error));
        }
        _ => continue_while(lexeme, cx, |ch| grammar.is_digit(ch)),
    }
}

/// Extend until the opening quote recurs; the closing quote ends the token.
fn in_string<G: Grammar, R: TokenRelay>(lexeme: &mut Lexeme, cx: &mut Cx<'_, G, R>) {
    lexeme.set_kind(TokenKind::String);
    let quote = lexeme.first_char();
    match lexeme.peek() {
        Some(ch) if Some(ch) == quote => {
            lexeme.extend();
            cx.emit(TokenizerEvent::EndToken(lexeme.clone()));
        }
        Some(_) => {
            lexeme.extend();
            cx.emit(TokenizerEvent::ContinueToken(lexeme.clone()));
        }
        None => cx.emit(TokenizerEvent::EndToken(lexeme.clone())),
    }
}

/// Longest match: grow only while the longer lexeme is still an operator.
fn in_operator<G: Grammar, R: TokenRelay>(grammar: &G, lexeme: &mut Lexeme, cx: &mut Cx<'_, G, R>) {
    lexeme.set_kind(TokenKind::Operator);
    if lexeme
        .peek_extended()
        .is_some_and(|longer| grammar.greedy_operator_check(longer))
    {
        lexeme.extend();
        cx.emit(TokenizerEvent::ContinueToken(lexeme.clone()));
    } else {
        cx.emit(TokenizerEvent::EndToken(lexeme.clone()));
    }
}

/// Validate what follows the token, then report it.
fn token_complete<G: Grammar, R: TokenRelay>(
    grammar: &G,
    lexeme: &mut Lexeme,
    cx: &mut Cx<'_, G, R>,
) {
    if let Some(next) = lexeme.peek() {
        if lexeme.kind() != TokenKind::Operator && !grammar.is_token_separator(next) {
            let error = LexError::invalid_character(lexeme.cursor(), next);
            cx.emit(TokenizerEvent::Error(error));
            return;
        }
    }

    if !lexeme.is_empty() {
        let token = lexeme.to_token();
        trace!(
            kind = %token.kind,
            text = %token.text,
            operator = ?grammar.operator_name(&token.text),
            value = ?token.value(),
            "token"
        );
        cx.machine().report_token(token);
    }

    if lexeme.cursor().has_more() {
        cx.emit(TokenizerEvent::BeginToken(lexeme.cursor().clone()));
    } else {
        cx.emit(TokenizerEvent::Initialise);
    }
}
