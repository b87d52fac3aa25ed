//! C preprocessor directive recognition built from two nested machines.
//!
//! A [`Preprocessor`] owns a C-family [`Tokenizer`] whose relay is the
//! preprocessor's own engine handle: every token the tokenizer finishes
//! arrives as an `OnToken` event. The preprocessor recognizes `#include`,
//! `#define`, `#undef`, `#ifdef`, `#ifndef` and `#endif` on lines starting with
//! `#`, and processes included files with a child preprocessor before taking
//! the next token of the includer.
//!
//! Conditional sections are recognized but never skipped.
//!
//! # Example
//!
//! ```rust
//! use fsm_relay::preprocessor::{Preprocessor, Transcript};
//! use std::sync::Arc;
//!
//! let transcript = Arc::new(Transcript::new());
//! let pp = Preprocessor::builder()
//!     .observer(transcript.clone())
//!     .build()
//!     .unwrap();
//!
//! pp.run_source("#define DEBUG\nint x;").unwrap();
//!
//! assert!(pp.ifdef("DEBUG"));
//! assert_eq!(transcript.tokens(), vec!["int", "x", ";"]);
//! ```

mod error;
mod events;
mod include;
mod machine;
mod observer;
mod states;
mod symbols;

pub use error::PreprocessError;
pub use events::{LineToken, PreprocessorEvent};
pub use include::{FsLoader, SourceLoader};
pub use machine::PreprocessorMachine;
pub use observer::{PreprocessorObserver, Record, Transcript};
pub use states::PreprocessorState;
pub use symbols::SymbolTable;

use crate::config::PreprocessorConfig;
use crate::engine::{Engine, Handle};
use crate::lexical::CFamily;
use crate::tokenizer::{TokenizeError, Tokenizer, TraceObserver};
use machine::Session;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A preprocessor: a tokenizer relaying into a directive machine.
pub struct Preprocessor {
    tokenizer: Tokenizer<CFamily, Handle<PreprocessorMachine>>,
    engine: Engine<PreprocessorMachine>,
    run: Mutex<()>,
}

impl Preprocessor {
    /// A preprocessor searching the `INCLUDE` directories, logging through
    /// `tracing`.
    pub fn new() -> Result<Self, PreprocessError> {
        Self::builder().build()
    }

    pub fn builder() -> PreprocessorBuilder {
        PreprocessorBuilder::new()
    }

    pub(crate) fn with_session(
        session: Session,
        ancestors: Vec<PathBuf>,
    ) -> Result<Self, PreprocessError> {
        let engine_config = session.config.engine.clone();
        let engine = Engine::with_config(
            PreprocessorMachine::new(session, ancestors),
            engine_config.clone(),
        )?;
        let tokenizer = Tokenizer::builder()
            .grammar(CFamily)
            .relay(engine.handle())
            .config(engine_config)
            .build()?;

        Ok(Self {
            tokenizer,
            engine,
            run: Mutex::new(()),
        })
    }

    /// Preprocess the file at `path`, including everything it includes.
    ///
    /// Returns the first error met. An include that cannot be resolved is
    /// reported but does not stop the rest of the file.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<(), PreprocessError> {
        let path = path.as_ref();
        let loader = &self.engine.machine().session().loader;
        let text = loader.load(path).map_err(|source| PreprocessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.process(Some(loader.canonicalize(path)), &text)
    }

    /// Preprocess `text`. Quoted includes resolve against the working
    /// directory.
    pub fn run_source(&self, text: &str) -> Result<(), PreprocessError> {
        self.process(None, text)
    }

    fn process(&self, file: Option<PathBuf>, text: &str) -> Result<(), PreprocessError> {
        let _run = self.run.lock();
        debug!(file = ?file, "preprocessing");
        self.engine.take_faults();
        self.engine.machine().set_current_file(file.clone());
        self.engine.enqueue(PreprocessorEvent::Initialise);

        let lexed = self.tokenizer.tokenize(text);
        self.engine.enqueue(PreprocessorEvent::EndOfInput);
        self.engine.wait_until_queue_empty();
        let fault = self.engine.take_faults().into_iter().next();

        match lexed {
            Ok(_) => {}
            Err(TokenizeError::Lexical(source)) => {
                return Err(PreprocessError::Lexical { path: file, source })
            }
            Err(TokenizeError::Faulted(message)) => return Err(PreprocessError::Panicked(message)),
            Err(TokenizeError::Engine(error)) => return Err(error.into()),
        }
        match fault {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }

    pub fn define(&self, name: &str) {
        self.symbols().define(name);
    }

    pub fn undef(&self, name: &str) -> Result<(), PreprocessError> {
        self.symbols().undef(name)
    }

    pub fn ifdef(&self, name: &str) -> bool {
        self.symbols().is_defined(name)
    }

    /// The symbol table, shared with every include child.
    pub fn symbols(&self) -> &SymbolTable {
        self.engine.machine().symbols()
    }

    pub fn engine(&self) -> &Engine<PreprocessorMachine> {
        &self.engine
    }
}

/// Builder for [`Preprocessor`].
pub struct PreprocessorBuilder {
    config: PreprocessorConfig,
    observer: Arc<dyn PreprocessorObserver>,
    loader: Arc<dyn SourceLoader>,
    symbols: Arc<SymbolTable>,
}

impl PreprocessorBuilder {
    /// Defaults: `INCLUDE` search path, filesystem loader, tracing observer,
    /// empty symbol table.
    pub fn new() -> Self {
        Self {
            config: PreprocessorConfig::from_env(),
            observer: Arc::new(TraceObserver),
            loader: Arc::new(FsLoader),
            symbols: Arc::new(SymbolTable::new()),
        }
    }

    pub fn config(mut self, config: PreprocessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.include_paths.push(path.into());
        self
    }

    pub fn observer(mut self, observer: Arc<dyn PreprocessorObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn SourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Share an existing symbol table.
    pub fn symbols(mut self, symbols: Arc<SymbolTable>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn build(self) -> Result<Preprocessor, PreprocessError> {
        let session = Session {
            symbols: self.symbols,
            observer: self.observer,
            loader: self.loader,
            config: Arc::new(self.config),
        };
        Preprocessor::with_session(session, Vec::new())
    }
}

impl Default for PreprocessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
