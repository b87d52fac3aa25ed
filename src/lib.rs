//! fsm-relay: a queued, threaded state machine engine.
//!
//! Machines are closed sets of states and events with a total transition
//! table. Each [`Engine`](engine::Engine) runs one machine on its own worker
//! thread, calling `enter`/`leave`/`reenter` hooks around transitions. Hooks
//! can emit follow-up events, and a machine can drive another one by relaying
//! its output into the other's queue.
//!
//! Two machines are built on the engine:
//!
//! - **Tokenizer**: classifies characters into decimal, hex, octal, binary,
//!   string, operator and symbol tokens.
//! - **Preprocessor**: owns a C-family tokenizer, receives its tokens as
//!   events, and handles `#include`, `#define`, `#undef`, `#ifdef`, `#ifndef`
//!   and `#endif`.
//!
//! # Example
//!
//! ```rust
//! use fsm_relay::core::State;
//! use fsm_relay::engine::{unhandled, Context, Engine, Event, StateMachine, Transition};
//! use std::convert::Infallible;
//!
//! #[derive(Debug)]
//! enum Door {
//!     Closed,
//!     Open,
//! }
//!
//! #[derive(Debug)]
//! enum Push {
//!     Open,
//!     Close,
//! }
//!
//! impl Event for Push {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Self::Open => "Open",
//!             Self::Close => "Close",
//!         }
//!     }
//! }
//!
//! struct DoorMachine;
//!
//! impl StateMachine for DoorMachine {
//!     type State = Door;
//!     type Event = Push;
//!     type Error = Infallible;
//!
//!     fn initial_state(&self) -> Door {
//!         Door::Closed
//!     }
//!
//!     fn on_event(&self, state: &Door, event: Push) -> Transition<Door> {
//!         match (state, event) {
//!             (Door::Closed, Push::Open) => Transition::Next(Door::Open),
//!             (Door::Open, Push::Close) => Transition::Next(Door::Closed),
//!             (state, event) => unhandled::<Self>(state, &event),
//!         }
//!     }
//! }
//!
//! impl State<DoorMachine> for Door {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Self::Closed => "Closed",
//!             Self::Open => "Open",
//!         }
//!     }
//! }
//!
//! let engine = Engine::new(DoorMachine).unwrap();
//! engine.enqueue(Push::Open);
//! engine.enqueue(Push::Open);
//! engine.wait_until_queue_empty();
//! assert_eq!(engine.state_name(), "Open");
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod lexical;
pub mod preprocessor;
pub mod tokenizer;

// Re-export commonly used types
pub use crate::core::{State, StateHistory, StateTransition};
pub use config::{EngineConfig, PreprocessorConfig};
pub use engine::{Engine, Event, StateMachine, Transition};
pub use preprocessor::{PreprocessError, Preprocessor};
pub use tokenizer::{Token, TokenKind, Tokenizer};
