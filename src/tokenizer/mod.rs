//! Character-level tokenizer built on the engine.
//!
//! The tokenizer is a state chart: `NewToken` classifies the next character
//! and routes the token into an `In*` continuation state, which extends it one
//! character per re-entry. `TokenComplete` checks what follows the token and
//! reports it.
//!
//! # Example
//!
//! ```rust
//! use fsm_relay::lexical::CFamily;
//! use fsm_relay::tokenizer::{TokenKind, Tokenizer};
//!
//! let tokenizer = Tokenizer::builder().grammar(CFamily).build().unwrap();
//! let tokens = tokenizer.tokenize("x <<= 0b101001;").unwrap();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//!
//! assert_eq!(texts, vec!["x", "<<=", "0b101001", ";"]);
//! assert_eq!(tokens[3].kind, TokenKind::Binary);
//! ```

mod cursor;
mod events;
mod machine;
mod observer;
mod states;
mod token;

pub use cursor::{Cursor, Position};
pub use events::TokenizerEvent;
pub use machine::TokenizerMachine;
pub use observer::{NoRelay, TokenObserver, TokenRelay, TraceObserver};
pub use states::TokenizerState;
pub use token::{LexError, Lexeme, NumericValue, Token, TokenKind};

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineError};
use crate::lexical::{Generic, Grammar};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`Tokenizer::tokenize`].
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    #[error("tokenizer faulted: {0}")]
    Faulted(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A tokenizer with its own engine.
pub struct Tokenizer<G: Grammar = Generic, R: TokenRelay = NoRelay> {
    engine: Engine<TokenizerMachine<G, R>>,
    parse: Mutex<()>,
}

impl Tokenizer {
    /// Generic grammar, no relay, no observer.
    pub fn new() -> Result<Self, EngineError> {
        Self::builder().build()
    }

    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }
}

impl<G: Grammar, R: TokenRelay> Tokenizer<G, R> {
    /// Tokenize `text`, blocking until every character has been processed.
    ///
    /// Returns the reported tokens in source order, or the first lexical
    /// error. A failed parse leaves the tokenizer ready for the next call.
    /// Calls on one tokenizer are serialized.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let _parse = self.parse.lock();
        let machine = self.engine.machine();
        machine.take_report();

        self.engine
            .enqueue(TokenizerEvent::BeginParsing(Cursor::new(text)));
        self.engine.wait_until_queue_empty();

        let report = machine.take_report();
        if let Some(fault) = self.engine.take_faults().into_iter().next() {
            return Err(TokenizeError::Faulted(fault.to_string()));
        }
        match report.error {
            Some(error) => Err(error.into()),
            None => Ok(report.tokens),
        }
    }

    pub fn grammar(&self) -> &G {
        self.engine.machine().grammar()
    }

    /// The underlying engine, for watchers and history.
    pub fn engine(&self) -> &Engine<TokenizerMachine<G, R>> {
        &self.engine
    }
}

/// Builder for [`Tokenizer`].
pub struct TokenizerBuilder<G = Generic, R = NoRelay> {
    grammar: G,
    relay: R,
    observer: Option<Arc<dyn TokenObserver>>,
    config: EngineConfig,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self {
            grammar: Generic,
            relay: NoRelay,
            observer: None,
            config: EngineConfig::default(),
        }
    }
}

impl Default for TokenizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar, R: TokenRelay> TokenizerBuilder<G, R> {
    pub fn grammar<G2: Grammar>(self, grammar: G2) -> TokenizerBuilder<G2, R> {
        TokenizerBuilder {
            grammar,
            relay: self.relay,
            observer: self.observer,
            config: self.config,
        }
    }

    /// Forward every finished token to `relay`.
    pub fn relay<R2: TokenRelay>(self, relay: R2) -> TokenizerBuilder<G, R2> {
        TokenizerBuilder {
            grammar: self.grammar,
            relay,
            observer: self.observer,
            config: self.config,
        }
    }

    pub fn observer(mut self, observer: Arc<dyn TokenObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the tokenizer's engine.
    pub fn build(self) -> Result<Tokenizer<G, R>, EngineError> {
        let machine = TokenizerMachine::new(self.grammar, self.relay, self.observer);
        let engine = Engine::with_config(machine, self.config)?;
        Ok(Tokenizer {
            engine,
            parse: Mutex::new(()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use crate::engine::Handle;
    use crate::lexical::CFamily;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn single(text: &str) -> Token {
        let tokens = Tokenizer::new().unwrap().tokenize(text).unwrap();
        assert_eq!(tokens.len(), 1, "{text:?} gave {tokens:?}");
        tokens.into_iter().next().unwrap()
    }

    #[test]
    fn decimal_literal() {
        let token = single("12345");
        assert_eq!(token.kind, TokenKind::Decimal);
        assert_eq!(token.text, "12345");
        assert_eq!(token.value(), Some(NumericValue::Integer(12345)));
    }

    #[test]
    fn hex_literal() {
        let token = single("0x38afe");
        assert_eq!(token.kind, TokenKind::Hex);
        assert_eq!(token.value(), Some(NumericValue::Integer(232446)));
    }

    #[test]
    fn binary_literal() {
        let token = single("0b101001");
        assert_eq!(token.kind, TokenKind::Binary);
        assert_eq!(token.value(), Some(NumericValue::Integer(41)));
    }

    #[test]
    fn octal_literal() {
        let token = single("01723");
        assert_eq!(token.kind, TokenKind::Octal);
        assert_eq!(token.value(), Some(NumericValue::Integer(0o1723)));
    }

    #[test]
    fn decimal_forms() {
        for text in ["0", "0.3", "4e3", ".3e4", "0e3", ".1e-12", ".1e+8", "12.5", ".5", "5."] {
            let token = single(text);
            assert_eq!(token.kind, TokenKind::Decimal, "{text}");
            assert_eq!(token.text, text);
            assert!(token.value().is_some(), "{text} has no value");
        }
    }

    #[test]
    fn second_period_is_a_lexical_error() {
        let tokenizer = Tokenizer::new().unwrap();
        let error = match tokenizer.tokenize("1234.6789.2") {
            Err(TokenizeError::Lexical(error)) => error,
            other => panic!("expected lexical error, got {other:?}"),
        };

        assert_eq!(error.offset, 9);
        assert_eq!(
            error.message,
            "invalid character '.' in \"1234.6789.2\" at position 9"
        );
        assert_eq!(tokenizer.engine().state_name(), "Initialised");
    }

    #[test]
    fn symbol_glued_to_number_is_rejected() {
        let result = Tokenizer::new().unwrap().tokenize(" 123x 45 678");
        match result {
            Err(TokenizeError::Lexical(error)) => {
                assert_eq!(error.offset, 4);
                assert_eq!(error.column, 5);
            }
            other => panic!("expected lexical error, got {other:?}"),
        }
    }

    #[test]
    fn tokenizer_is_reusable_after_an_error() {
        let tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize("1..").is_err());

        let tokens = tokenizer.tokenize(" 123 456 ").unwrap();
        assert_eq!(texts(&tokens), vec!["123", "456"]);
    }

    #[test]
    fn expression_with_mixed_literals() {
        let tokens = Tokenizer::new()
            .unwrap()
            .tokenize("123*0x2+ 0b10 / 19.234\t- 29^2")
            .unwrap();

        assert_eq!(
            texts(&tokens),
            vec!["123", "*", "0x2", "+", "0b10", "/", "19.234", "-", "29", "^", "2"]
        );
    }

    #[test]
    fn generic_operators_are_single_chars() {
        let tokens = Tokenizer::new().unwrap().tokenize("++").unwrap();
        assert_eq!(texts(&tokens), vec!["+", "+"]);
    }

    #[test]
    fn c_family_operators_use_longest_match() {
        let tokenizer = Tokenizer::builder().grammar(CFamily).build().unwrap();
        let tokens = tokenizer.tokenize("(*(++next))++ a::b != c").unwrap();

        assert_eq!(
            texts(&tokens),
            vec!["(", "*", "(", "++", "next", ")", ")", "++", "a", "::", "b", "!=", "c"]
        );
    }

    #[test]
    fn compound_assignment_and_member_arrow_are_single_operators() {
        let tokenizer = Tokenizer::builder().grammar(CFamily).build().unwrap();
        let tokens = tokenizer.tokenize("flags <<= 1; node->next ^= mask").unwrap();

        assert_eq!(
            texts(&tokens),
            vec!["flags", "<<=", "1", ";", "node", "->", "next", "^=", "mask"]
        );
    }

    #[test]
    fn strings_keep_their_quotes() {
        let tokens = Tokenizer::new().unwrap().tokenize("'a b' \"c\"").unwrap();

        assert_eq!(texts(&tokens), vec!["'a b'", "\"c\""]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn unterminated_string_ends_at_end_of_input() {
        let token = single("\"abc");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "\"abc");
    }

    #[test]
    fn positions_track_lines() {
        let tokens = Tokenizer::new().unwrap().tokenize("int main()\n{\n}").unwrap();
        let brace = tokens.iter().find(|t| t.text == "{").unwrap();
        let close = tokens.iter().find(|t| t.text == "}").unwrap();

        assert_eq!((brace.line, brace.column), (2, 1));
        assert_eq!((close.line, close.column), (3, 1));
        assert_eq!(close.offset, 13);
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        let tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize("").unwrap().is_empty());
        assert!(tokenizer.tokenize(" \t\n").unwrap().is_empty());
    }

    #[derive(Default)]
    struct Collect {
        tokens: Mutex<Vec<String>>,
        errors: Mutex<usize>,
    }

    impl TokenObserver for Collect {
        fn on_token(&self, token: &Token) {
            self.tokens.lock().push(token.text.clone());
        }

        fn on_error(&self, _error: &LexError) {
            *self.errors.lock() += 1;
        }
    }

    #[test]
    fn observer_sees_tokens_and_errors() {
        let observer = Arc::new(Collect::default());
        let tokenizer = Tokenizer::builder()
            .observer(observer.clone())
            .build()
            .unwrap();

        tokenizer.tokenize("a + b").unwrap();
        assert!(tokenizer.tokenize("1x").is_err());

        assert_eq!(*observer.tokens.lock(), vec!["a", "+", "b"]);
        assert_eq!(*observer.errors.lock(), 1);
    }

    #[test]
    fn relay_forwards_finished_tokens_to_another_engine() {
        let collected = Arc::new(Collect::default());
        let relay = RelayTo(Arc::clone(&collected));

        let tokenizer = Tokenizer::builder().relay(relay).build().unwrap();
        tokenizer.tokenize("x = 1").unwrap();

        assert_eq!(*collected.tokens.lock(), vec!["x", "=", "1"]);
    }

    struct RelayTo(Arc<Collect>);

    impl TokenRelay for RelayTo {
        fn relay(&self, token: &Token) {
            self.0.on_token(token);
        }
    }

    #[test]
    fn handles_relay_into_machines_accepting_tokens() {
        fn assert_relay<T: TokenRelay>() {}
        assert_relay::<Handle<crate::preprocessor::PreprocessorMachine>>();
    }

    #[test]
    fn history_shows_reentry_while_extending() {
        let config = EngineConfig::default().with_history(64);
        let tokenizer = Tokenizer::builder().config(config).build().unwrap();
        tokenizer.tokenize("abc").unwrap();

        let history = tokenizer.engine().history();
        let path = history.get_path();
        assert_eq!(
            path,
            vec![
                "Initialised",
                "Parse",
                "NewToken",
                "InSymbol",
                "InSymbol",
                "InSymbol",
                "TokenComplete",
                "Initialised"
            ]
        );
        assert!(!TokenizerState::Initialised.is_in_token());
        assert!(!State::<TokenizerMachine<Generic, NoRelay>>::is_error(
            &TokenizerState::Initialised
        ));
    }
}
