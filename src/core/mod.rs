//! Core state types.
//!
//! This module contains what every machine built on the engine shares:
//! - State definitions via the `State` trait, including lifecycle hooks
//! - A bounded transition history

mod history;
mod state;

pub use history::{StateHistory, StateTransition, TransitionKind};
pub use state::State;
