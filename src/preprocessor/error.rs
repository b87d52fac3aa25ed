use crate::engine::{EngineError, Fault, FaultCause};
use crate::tokenizer::LexError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while preprocessing.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("symbol '{0}' is not defined")]
    UndefinedSymbol(String),

    #[error("malformed #{directive} at line {line}: unexpected `{found}`")]
    MalformedDirective {
        directive: &'static str,
        line: usize,
        found: String,
    },

    #[error("cannot resolve include \"{name}\" (searched {} candidates)", searched.len())]
    IncludeNotFound { name: String, searched: Vec<PathBuf> },

    #[error("{} includes itself", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("including {} exceeds the depth limit of {limit}", path.display())]
    IncludeDepthExceeded { path: PathBuf, limit: usize },

    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lexical error in {}: {source}", describe(path.as_deref()))]
    Lexical {
        path: Option<PathBuf>,
        #[source]
        source: LexError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("preprocessor panicked: {0}")]
    Panicked(String),
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "<source>".to_string(), |p| p.display().to_string())
}

impl From<Fault<PreprocessError>> for PreprocessError {
    fn from(fault: Fault<PreprocessError>) -> Self {
        match fault.cause {
            FaultCause::Hook(error) => error,
            FaultCause::Panic(message) => Self::Panicked(format!(
                "{message} (state '{}', event '{}')",
                fault.state, fault.event
            )),
        }
    }
}
