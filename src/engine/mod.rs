//! Event-driven state machine engine.
//!
//! A machine is a closed set of states (an enum implementing
//! [`State`](crate::core::State)), a closed set of events (an enum implementing
//! [`Event`]) and a transition table ([`StateMachine::on_event`]). The
//! [`Engine`] owns the current state and a FIFO queue, and processes events one
//! at a time on its own worker thread.

mod dispatch;
mod error;
mod machine;

pub use dispatch::{Context, Engine, Handle};
pub use error::{EngineError, Fault, FaultCause};
pub use machine::{unhandled, Event, StateMachine, Transition};
