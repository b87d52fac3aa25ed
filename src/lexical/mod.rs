//! Lexical grammars: the character classes and lookup tables a tokenizer
//! consults.
//!
//! A [`Grammar`] carries no control flow of its own. The tokenizer asks it how
//! to classify a character and whether a longer operator lexeme exists; the
//! preprocessor asks it which keyword a lexeme is.

mod c_family;

pub use c_family::{CFamily, Keyword, Operator};

/// Character classes and the operator longest-match test.
///
/// Every method has a default; a grammar overrides only what differs from the
/// generic one.
///
/// # Example
///
/// ```rust
/// use fsm_relay::lexical::{Generic, Grammar};
///
/// struct Dollar;
///
/// impl Grammar for Dollar {
///     fn is_symbol_char(&self, ch: char) -> bool {
///         ch == '$' || Generic.is_symbol_char(ch)
///     }
/// }
///
/// assert!(Dollar.is_symbol_char('$'));
/// assert!(!Generic.is_symbol_char('$'));
/// ```
pub trait Grammar: Send + Sync + 'static {
    fn is_space(&self, ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
    }

    fn is_digit(&self, ch: char) -> bool {
        ch.is_ascii_digit()
    }

    fn is_hex_digit(&self, ch: char) -> bool {
        ch.is_ascii_hexdigit()
    }

    fn is_oct_digit(&self, ch: char) -> bool {
        matches!(ch, '0'..='7')
    }

    fn is_bin_digit(&self, ch: char) -> bool {
        matches!(ch, '0' | '1')
    }

    fn is_operator_char(&self, ch: char) -> bool {
        "*|&!<>=+-/,.^()[]{}:;".contains(ch)
    }

    fn is_quote_char(&self, ch: char) -> bool {
        matches!(ch, '\'' | '"')
    }

    /// Letters, digits, `_`, and anything outside ASCII.
    fn is_symbol_char(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii()
    }

    /// Characters allowed right after a completed non-operator token.
    fn is_token_separator(&self, ch: char) -> bool {
        self.is_space(ch) || self.is_operator_char(ch)
    }

    /// Whether `lexeme` is a recognized operator, used to decide if an
    /// operator token may grow by one more character.
    ///
    /// The default recognizes nothing, so operators are single characters.
    fn greedy_operator_check(&self, lexeme: &str) -> bool {
        let _ = lexeme;
        false
    }

    /// Descriptive name of an operator lexeme, for diagnostics.
    fn operator_name(&self, lexeme: &str) -> Option<&'static str> {
        let _ = lexeme;
        None
    }
}

/// The grammar with every default: single-character operators, no keywords.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generic;

impl Grammar for Generic {}
