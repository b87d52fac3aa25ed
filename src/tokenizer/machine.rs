//! The tokenizer's machine definition and transition table.

use super::events::TokenizerEvent;
use super::observer::{TokenObserver, TokenRelay};
use super::states::TokenizerState;
use super::token::{LexError, Lexeme, Token};
use crate::engine::{unhandled, StateMachine, Transition};
use crate::lexical::Grammar;
use parking_lot::Mutex;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct Report {
    pub tokens: Vec<Token>,
    pub error: Option<LexError>,
}

/// Tokenizer machine over grammar `G`, relaying finished tokens to `R`.
pub struct TokenizerMachine<G, R> {
    grammar: G,
    relay: R,
    observer: Option<Arc<dyn TokenObserver>>,
    report: Mutex<Report>,
}

impl<G: Grammar, R: TokenRelay> TokenizerMachine<G, R> {
    pub(crate) fn new(grammar: G, relay: R, observer: Option<Arc<dyn TokenObserver>>) -> Self {
        Self {
            grammar,
            relay,
            observer,
            report: Mutex::new(Report::default()),
        }
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    pub(crate) fn report_token(&self, token: Token) {
        if let Some(observer) = &self.observer {
            observer.on_token(&token);
        }
        self.report.lock().tokens.push(token);
    }

    /// Keeps the first error of a parse.
    pub(crate) fn report_error(&self, error: LexError) {
        if let Some(observer) = &self.observer {
            observer.on_error(&error);
        }
        self.report.lock().error.get_or_insert(error);
    }

    pub(crate) fn take_report(&self) -> Report {
        std::mem::take(&mut *self.report.lock())
    }

    fn end_token(&self, lexeme: Lexeme) -> Transition<TokenizerState> {
        if !lexeme.is_empty() {
            self.relay.relay(&lexeme.to_token());
        }
        Transition::Next(TokenizerState::TokenComplete(lexeme))
    }
}

impl<G: Grammar, R: TokenRelay> StateMachine for TokenizerMachine<G, R> {
    type State = TokenizerState;
    type Event = TokenizerEvent;
    type Error = Infallible;

    fn initial_state(&self) -> TokenizerState {
        TokenizerState::Initialised
    }

    fn on_event(&self, state: &TokenizerState, event: TokenizerEvent) -> Transition<TokenizerState> {
        use TokenizerEvent as E;
        use TokenizerState as S;

        let next = match (state, event) {
            (_, E::Initialise) => S::Initialised,
            (_, E::Error(error)) => S::Error(error),
            (_, E::EndToken(lexeme)) => return self.end_token(lexeme),

            (S::Initialised, E::BeginParsing(cursor)) => S::Parse(cursor),
            (S::Parse(_) | S::NewToken(_) | S::TokenComplete(_), E::BeginToken(cursor)) => {
                S::NewToken(Lexeme::at(cursor))
            }

            (S::NewToken(_), E::SeenDigit(lexeme)) => S::InNumeric(lexeme),
            (S::NewToken(_), E::SeenLeadingZero(lexeme)) => S::InNumericBase(lexeme),
            (S::NewToken(_), E::SeenOperatorChar(lexeme)) => S::InOperator(lexeme),
            (S::NewToken(_), E::SeenQuote(lexeme)) => S::InString(lexeme),
            (S::NewToken(_), E::SeenSymbolChar(lexeme)) => S::InSymbol(lexeme),
            (S::NewToken(_), E::ToDecLiteral(lexeme)) => S::InDecimal(lexeme),

            (S::InNumericBase(_), E::ToBinLiteral(lexeme)) => S::InBinary(lexeme),
            (S::InNumericBase(_), E::ToHexLiteral(lexeme)) => S::InHex(lexeme),
            (S::InNumericBase(_), E::ToOctLiteral(lexeme)) => S::InOctal(lexeme),
            (S::InNumericBase(_) | S::InNumeric(_), E::ToDecLiteral(lexeme)) => {
                S::InDecimal(lexeme)
            }
            (
                S::InNumericBase(_) | S::InNumeric(_) | S::InDecimal(_),
                E::SeenExponent(lexeme),
            ) => S::InExponent(lexeme),

            (state, E::ContinueToken(lexeme)) if state.is_in_token() => continue_in(state, lexeme),

            (state, event) => return unhandled::<Self>(state, &event),
        };
        Transition::Next(next)
    }
}

/// A new value of the same in-token variant.
fn continue_in(state: &TokenizerState, lexeme: Lexeme) -> TokenizerState {
    use TokenizerState as S;
    match state {
        S::InNumeric(_) => S::InNumeric(lexeme),
        S::InNumericBase(_) => S::InNumericBase(lexeme),
        S::InDecimal(_) => S::InDecimal(lexeme),
        S::InExponent(_) => S::InExponent(lexeme),
        S::InHex(_) => S::InHex(lexeme),
        S::InOctal(_) => S::InOctal(lexeme),
        S::InBinary(_) => S::InBinary(lexeme),
        S::InString(_) => S::InString(lexeme),
        S::InOperator(_) => S::InOperator(lexeme),
        _ => S::InSymbol(lexeme),
    }
}
