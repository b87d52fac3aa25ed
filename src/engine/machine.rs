//! Machine definitions: the traits a concrete state machine implements.

use crate::core::State;
use std::fmt::Debug;
use tracing::debug;

/// An event a machine reacts to.
pub trait Event: Debug + Send + 'static {
    /// Stable variant name for logs and history.
    fn name(&self) -> &'static str;
}

/// Outcome of looking up a (state, event) pair in a transition table.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<S> {
    /// Move to this state. A value of the current variant re-enters it.
    Next(S),
    /// No rule for the pair: the current state stays as it is and no hook runs.
    Ignore,
}

/// A machine definition driven by an [`Engine`](crate::engine::Engine).
///
/// The definition is shared between the engine's worker and the owner, so any
/// data it mutates from hooks must be behind interior mutability.
pub trait StateMachine: Send + Sync + Sized + 'static {
    type State: State<Self>;
    type Event: Event;
    /// Error hooks may return; failures become [`Fault`](crate::engine::Fault)s.
    type Error: std::error::Error + Send + 'static;

    /// State the worker starts in.
    fn initial_state(&self) -> Self::State;

    /// The transition table. Must be total: pairs without a rule should
    /// return [`unhandled`].
    fn on_event(&self, state: &Self::State, event: Self::Event) -> Transition<Self::State>;
}

/// Default rule for (state, event) pairs a table does not mention.
///
/// Leaves the state untouched. Debug builds log the combination.
pub fn unhandled<M: StateMachine>(state: &M::State, event: &M::Event) -> Transition<M::State> {
    if cfg!(debug_assertions) {
        debug!(
            state = state.name(),
            event = event.name(),
            "unhandled state/event combination"
        );
    }
    Transition::Ignore
}
