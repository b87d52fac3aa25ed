//! Core State trait for state machine states.
//!
//! States are closed enums whose variants carry their own payload. Besides
//! naming itself, a state may opt into lifecycle hooks which the engine calls
//! around transitions. Hooks have no-op defaults, so a state type that needs
//! no lifecycle behavior implements only `name`.

use crate::engine::{Context, StateMachine};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Hooks
///
/// - `enter` runs after the state became current through a transition from a
///   *different* variant.
/// - `leave` runs on the outgoing state just before such a transition.
/// - `reenter` runs instead of `leave`/`enter` when the transition produced a
///   new value of the *same* variant, e.g. a tokenizer state that consumed one
///   more character.
///
/// Hooks may emit further events through the [`Context`]; those are processed
/// before the engine takes the next queued event.
///
/// # Example
///
/// ```rust
/// use fsm_relay::core::State;
/// use fsm_relay::engine::{Context, Event, StateMachine, Transition};
/// use std::convert::Infallible;
///
/// #[derive(Debug)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// #[derive(Debug)]
/// struct Toggle;
///
/// impl Event for Toggle {
///     fn name(&self) -> &'static str {
///         "Toggle"
///     }
/// }
///
/// struct Lights;
///
/// impl StateMachine for Lights {
///     type State = Light;
///     type Event = Toggle;
///     type Error = Infallible;
///
///     fn initial_state(&self) -> Light {
///         Light::Red
///     }
///
///     fn on_event(&self, state: &Light, _event: Toggle) -> Transition<Light> {
///         match state {
///             Light::Red => Transition::Next(Light::Green),
///             Light::Green => Transition::Next(Light::Red),
///         }
///     }
/// }
///
/// impl State<Lights> for Light {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Red => "Red",
///             Self::Green => "Green",
///         }
///     }
///
///     fn enter(&mut self, _cx: &mut Context<'_, Lights>) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
/// ```
pub trait State<M: StateMachine>: Debug + Send + 'static {
    /// Get the state's name for display/logging.
    ///
    /// Names are also what [`Engine::wait_until_state`] matches against, so
    /// every variant should have a distinct one.
    ///
    /// [`Engine::wait_until_state`]: crate::engine::Engine::wait_until_state
    fn name(&self) -> &'static str;

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Called once the state became current through a variant change.
    fn enter(&mut self, cx: &mut Context<'_, M>) -> Result<(), M::Error> {
        let _ = cx;
        Ok(())
    }

    /// Called on the outgoing state before a variant change.
    fn leave(&mut self, cx: &mut Context<'_, M>) -> Result<(), M::Error> {
        let _ = cx;
        Ok(())
    }

    /// Called on the new value when a transition keeps the same variant.
    fn reenter(&mut self, cx: &mut Context<'_, M>) -> Result<(), M::Error> {
        let _ = cx;
        Ok(())
    }
}
