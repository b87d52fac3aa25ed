//! The preprocessor's machine definition and transition table.

use super::error::PreprocessError;
use super::events::{LineToken, PreprocessorEvent};
use super::include::{self, SourceLoader};
use super::observer::PreprocessorObserver;
use super::states::PreprocessorState;
use super::symbols::SymbolTable;
use super::Preprocessor;
use crate::config::PreprocessorConfig;
use crate::engine::{unhandled, StateMachine, Transition};
use crate::lexical::CFamily;
use crate::tokenizer::Token;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a preprocessor shares with the children it spawns for includes.
#[derive(Clone)]
pub(crate) struct Session {
    pub symbols: Arc<SymbolTable>,
    pub observer: Arc<dyn PreprocessorObserver>,
    pub loader: Arc<dyn SourceLoader>,
    pub config: Arc<PreprocessorConfig>,
}

/// Preprocessor machine: directive recognition over a relayed token stream.
pub struct PreprocessorMachine {
    grammar: CFamily,
    session: Session,
    /// Files currently being processed above this one, outermost first.
    ancestors: Vec<PathBuf>,
    current_file: Mutex<Option<PathBuf>>,
    /// Line of the last completed directive; its remaining tokens are dropped.
    closed_line: Mutex<Option<usize>>,
}

impl PreprocessorMachine {
    pub(crate) fn new(session: Session, ancestors: Vec<PathBuf>) -> Self {
        Self {
            grammar: CFamily,
            session,
            ancestors,
            current_file: Mutex::new(None),
            closed_line: Mutex::new(None),
        }
    }

    pub fn grammar(&self) -> &CFamily {
        &self.grammar
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.session.symbols
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_file(&self) -> Option<PathBuf> {
        self.current_file.lock().clone()
    }

    pub(crate) fn set_current_file(&self, file: Option<PathBuf>) {
        *self.current_file.lock() = file;
        *self.closed_line.lock() = None;
    }

    pub(crate) fn close_line(&self, line: usize) {
        *self.closed_line.lock() = Some(line);
    }

    /// Whether `line` holds a directive that has already been handled.
    pub(crate) fn is_closed_line(&self, line: usize) -> bool {
        *self.closed_line.lock() == Some(line)
    }

    pub(crate) fn report_token(&self, token: &Token) {
        let file = self.current_file();
        self.session.observer.on_token(file.as_deref(), token);
    }

    /// `#include "name"`.
    pub(crate) fn include_quoted(&self, name: &str) -> Result<(), PreprocessError> {
        let current = self.current_file();
        let candidates = include::quoted_candidates(name, current.as_deref());
        self.include(name, candidates)
    }

    /// `#include <name>`.
    pub(crate) fn include_from_path(&self, name: &str) -> Result<(), PreprocessError> {
        let candidates = include::angle_candidates(name, &self.session.config.include_paths);
        self.include(name, candidates)
    }

    /// Run a child preprocessor over the first candidate that exists, to
    /// completion, on this thread.
    fn include(&self, name: &str, candidates: Vec<PathBuf>) -> Result<(), PreprocessError> {
        let loader = &*self.session.loader;
        let Some(found) = include::resolve(loader, &candidates) else {
            warn!(name, searched = candidates.len(), "include not found");
            self.session.observer.on_unresolved_include(name);
            return Err(PreprocessError::IncludeNotFound {
                name: name.to_string(),
                searched: candidates,
            });
        };

        let path = loader.canonicalize(&found);
        let mut chain = self.ancestors.clone();
        chain.extend(self.current_file());
        if chain.contains(&path) {
            return Err(PreprocessError::IncludeCycle { path });
        }
        let depth = chain.len();
        let limit = self.session.config.max_include_depth;
        if depth > limit {
            return Err(PreprocessError::IncludeDepthExceeded { path, limit });
        }

        debug!(path = %path.display(), depth, "including");
        self.session.observer.on_include(&path, depth);
        let child = Preprocessor::with_session(self.session.clone(), chain)?;
        child.run(&path)
    }

    fn in_directive(
        state: &PreprocessorState,
        line: usize,
        token: Token,
    ) -> Transition<PreprocessorState> {
        use PreprocessorState as S;

        if token.line != line {
            let next = match state {
                S::IncludeFromPath { at, .. } => S::IncludeUnterminated {
                    at: at.clone(),
                    next: Some(token),
                },
                _ => S::ReceiveToken(token),
            };
            return Transition::Next(next);
        }
        let next = match state {
            S::Directive(at) => S::Directive(at.advance(token)),
            S::Include(at) => S::Include(at.advance(token)),
            S::IncludeFromPath { at, path } => {
                let mut path = path.clone();
                if token.text != ">" {
                    path.push_str(&token.text);
                }
                S::IncludeFromPath {
                    at: at.advance(token),
                    path,
                }
            }
            S::Define(at) => S::Define(at.advance(token)),
            S::Undef(at) => S::Undef(at.advance(token)),
            S::Ifdef(at) => S::Ifdef(at.advance(token)),
            S::Ifndef(at) => S::Ifndef(at.advance(token)),
            S::Endif(at) => S::Endif(at.advance(token)),
            _ => S::ReceiveToken(token),
        };
        Transition::Next(next)
    }
}

impl StateMachine for PreprocessorMachine {
    type State = PreprocessorState;
    type Event = PreprocessorEvent;
    type Error = PreprocessError;

    fn initial_state(&self) -> PreprocessorState {
        PreprocessorState::Initialised
    }

    fn on_event(
        &self,
        state: &PreprocessorState,
        event: PreprocessorEvent,
    ) -> Transition<PreprocessorState> {
        use PreprocessorEvent as E;
        use PreprocessorState as S;

        let next = match (state, event) {
            (_, E::Initialise) => S::Initialised,

            (
                S::Initialised | S::ReceiveToken(_) | S::IncludeUnterminated { .. },
                E::OnToken(token),
            ) => S::ReceiveToken(token),
            (state, E::OnToken(token)) => match state.directive_line() {
                Some(line) => return Self::in_directive(state, line, token),
                None => return unhandled::<Self>(state, &E::OnToken(token)),
            },

            (S::ReceiveToken(_), E::SeenDirective(token)) => S::Directive(LineToken::new(token)),
            (S::Directive(_), E::SeenInclude(at)) => S::Include(at),
            (S::Directive(_), E::SeenDefine(at)) => S::Define(at),
            (S::Directive(_), E::SeenUndef(at)) => S::Undef(at),
            (S::Directive(_), E::SeenIfdef(at)) => S::Ifdef(at),
            (S::Directive(_), E::SeenIfndef(at)) => S::Ifndef(at),
            (S::Directive(_), E::SeenEndif(at)) => S::Endif(at),

            (S::Include(_), E::IncludeOpenBracket(at)) => S::IncludeFromPath {
                at,
                path: String::new(),
            },
            (S::IncludeFromPath { .. }, E::IncludeCloseBracket(token)) => {
                S::EndIncludeFromPath(token)
            }
            (S::IncludeFromPath { at, .. }, E::EndOfInput) => S::IncludeUnterminated {
                at: at.clone(),
                next: None,
            },

            (state, event) => return unhandled::<Self>(state, &event),
        };
        Transition::Next(next)
    }
}
