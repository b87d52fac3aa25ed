//! Observing what a preprocessor passes through.

use crate::tokenizer::{Token, TraceObserver};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Callbacks from a preprocessor and all of its include children.
///
/// `file` is `None` for text given to
/// [`Preprocessor::run_source`](super::Preprocessor::run_source).
pub trait PreprocessorObserver: Send + Sync {
    /// A token outside any directive line.
    fn on_token(&self, file: Option<&Path>, token: &Token) {
        let _ = (file, token);
    }

    /// An include was resolved and is about to be processed.
    fn on_include(&self, path: &Path, depth: usize) {
        let _ = (path, depth);
    }

    fn on_unresolved_include(&self, name: &str) {
        let _ = name;
    }
}

impl PreprocessorObserver for TraceObserver {
    fn on_token(&self, file: Option<&Path>, token: &Token) {
        info!(
            file = ?file,
            line = token.line,
            column = token.column,
            kind = %token.kind,
            text = %token.text,
            "token"
        );
    }

    fn on_include(&self, path: &Path, depth: usize) {
        info!(path = %path.display(), depth, "include");
    }

    fn on_unresolved_include(&self, name: &str) {
        warn!(name, "unresolved include");
    }
}

/// One observed event.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Token { file: Option<PathBuf>, token: Token },
    Include { path: PathBuf, depth: usize },
    Unresolved { name: String },
}

/// Observer that records everything in arrival order.
#[derive(Debug, Default)]
pub struct Transcript {
    records: Mutex<Vec<Record>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Texts of the recorded tokens.
    pub fn tokens(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter_map(|record| match record {
                Record::Token { token, .. } => Some(token.text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PreprocessorObserver for Transcript {
    fn on_token(&self, file: Option<&Path>, token: &Token) {
        self.records.lock().push(Record::Token {
            file: file.map(Path::to_path_buf),
            token: token.clone(),
        });
    }

    fn on_include(&self, path: &Path, depth: usize) {
        self.records.lock().push(Record::Include {
            path: path.to_path_buf(),
            depth,
        });
    }

    fn on_unresolved_include(&self, name: &str) {
        self.records.lock().push(Record::Unresolved {
            name: name.to_string(),
        });
    }
}
