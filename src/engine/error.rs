//! Engine error types.

use thiserror::Error;

/// Errors raised by engine construction.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("invalid worker thread name {0:?}")]
    InvalidThreadName(String),
}

/// Why a dispatched event failed.
#[derive(Debug, Error)]
pub enum FaultCause<E: std::error::Error + 'static> {
    /// A lifecycle hook returned an error.
    #[error("hook failed: {0}")]
    Hook(#[source] E),

    /// The transition function or a hook panicked.
    #[error("panicked: {0}")]
    Panic(String),
}

/// A failure caught at the worker boundary.
///
/// The event that caused it has been retired; the worker keeps running.
#[derive(Debug, Error)]
#[error("{cause} (state '{state}', event '{event}')")]
pub struct Fault<E: std::error::Error + 'static> {
    /// State that was current when the event was dispatched
    pub state: &'static str,
    /// Event being dispatched
    pub event: &'static str,
    #[source]
    pub cause: FaultCause<E>,
}
