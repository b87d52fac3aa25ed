use super::cursor::Cursor;
use super::token::{LexError, Lexeme};
use crate::engine::Event;

/// Events of the tokenizer machine.
///
/// The classification events (`Seen*`, `To*Literal`) route a just-started
/// token into the state that knows how to continue it.
#[derive(Debug)]
pub enum TokenizerEvent {
    Initialise,
    BeginParsing(Cursor),
    BeginToken(Cursor),
    ContinueToken(Lexeme),
    EndToken(Lexeme),
    SeenDigit(Lexeme),
    SeenLeadingZero(Lexeme),
    SeenOperatorChar(Lexeme),
    SeenQuote(Lexeme),
    SeenSymbolChar(Lexeme),
    SeenExponent(Lexeme),
    ToBinLiteral(Lexeme),
    ToOctLiteral(Lexeme),
    ToHexLiteral(Lexeme),
    ToDecLiteral(Lexeme),
    Error(LexError),
}

impl Event for TokenizerEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialise => "Initialise",
            Self::BeginParsing(_) => "BeginParsing",
            Self::BeginToken(_) => "BeginToken",
            Self::ContinueToken(_) => "ContinueToken",
            Self::EndToken(_) => "EndToken",
            Self::SeenDigit(_) => "SeenDigit",
            Self::SeenLeadingZero(_) => "SeenLeadingZero",
            Self::SeenOperatorChar(_) => "SeenOperatorChar",
            Self::SeenQuote(_) => "SeenQuote",
            Self::SeenSymbolChar(_) => "SeenSymbolChar",
            Self::SeenExponent(_) => "SeenExponent",
            Self::ToBinLiteral(_) => "ToBinLiteral",
            Self::ToOctLiteral(_) => "ToOctLiteral",
            Self::ToHexLiteral(_) => "ToHexLiteral",
            Self::ToDecLiteral(_) => "ToDecLiteral",
            Self::Error(_) => "Error",
        }
    }
}
