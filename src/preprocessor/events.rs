use crate::engine::Event;
use crate::tokenizer::Token;

/// The directive line being processed and the token that was just received
/// on it.
#[derive(Clone, Debug, PartialEq)]
pub struct LineToken {
    pub line: usize,
    pub token: Token,
}

impl LineToken {
    /// Starts a directive on the token's own line.
    pub fn new(token: Token) -> Self {
        Self {
            line: token.line,
            token,
        }
    }

    /// The same directive line with the next token.
    pub fn advance(&self, token: Token) -> Self {
        Self {
            line: self.line,
            token,
        }
    }
}

/// Events of the preprocessor machine.
#[derive(Debug)]
pub enum PreprocessorEvent {
    Initialise,
    /// A finished token relayed from the nested tokenizer.
    OnToken(Token),
    SeenDirective(Token),
    SeenInclude(LineToken),
    SeenDefine(LineToken),
    SeenUndef(LineToken),
    SeenIfdef(LineToken),
    SeenIfndef(LineToken),
    SeenEndif(LineToken),
    IncludeOpenBracket(LineToken),
    IncludeCloseBracket(Token),
    /// The nested tokenizer has relayed its last token.
    EndOfInput,
}

impl From<Token> for PreprocessorEvent {
    fn from(token: Token) -> Self {
        Self::OnToken(token)
    }
}

impl Event for PreprocessorEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialise => "Initialise",
            Self::OnToken(_) => "OnToken",
            Self::SeenDirective(_) => "SeenDirective",
            Self::SeenInclude(_) => "SeenInclude",
            Self::SeenDefine(_) => "SeenDefine",
            Self::SeenUndef(_) => "SeenUndef",
            Self::SeenIfdef(_) => "SeenIfdef",
            Self::SeenIfndef(_) => "SeenIfndef",
            Self::SeenEndif(_) => "SeenEndif",
            Self::IncludeOpenBracket(_) => "IncludeOpenBracket",
            Self::IncludeCloseBracket(_) => "IncludeCloseBracket",
            Self::EndOfInput => "EndOfInput",
        }
    }
}
