//! Where finished tokens go besides the tokenizer's own result.

use super::token::{LexError, Token};
use crate::engine::{Handle, StateMachine};
use tracing::{info, warn};

/// Receives every reported token and lexical error, on the worker thread.
pub trait TokenObserver: Send + Sync {
    fn on_token(&self, token: &Token) {
        let _ = token;
    }

    fn on_error(&self, error: &LexError) {
        let _ = error;
    }
}

/// Logs tokens at `info` and errors at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceObserver;

impl TokenObserver for TraceObserver {
    fn on_token(&self, token: &Token) {
        info!(
            kind = %token.kind,
            text = %token.text,
            value = ?token.value(),
            line = token.line,
            column = token.column,
            "token"
        );
    }

    fn on_error(&self, error: &LexError) {
        warn!(%error, offset = error.offset, "lexical error");
    }
}

/// Forwards each finished token to another machine.
///
/// Called from the tokenizer's `EndToken` rule, before the tokenizer moves on
/// to `TokenComplete`. Empty tokens are never relayed.
pub trait TokenRelay: Send + Sync + 'static {
    fn relay(&self, token: &Token);
}

/// A relay that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRelay;

impl TokenRelay for NoRelay {
    fn relay(&self, _token: &Token) {}
}

impl<M> TokenRelay for Handle<M>
where
    M: StateMachine,
    M::Event: From<Token>,
{
    fn relay(&self, token: &Token) {
        self.enqueue(M::Event::from(token.clone()));
    }
}
