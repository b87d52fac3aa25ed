//! State transition history tracking.
//!
//! An engine can keep a bounded journal of the transitions it performed.
//! Records store state and event names rather than the states themselves, so
//! the journal stays cheap for machines whose states carry large payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How a transition affected the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The variant changed: `leave` then `enter` ran.
    Changed,
    /// The variant stayed the same: `reenter` ran.
    Reentered,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use fsm_relay::core::{StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "Initialised".to_string(),
///     to: "Parse".to_string(),
///     event: "BeginParsing".to_string(),
///     kind: TransitionKind::Changed,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.kind, TransitionKind::Changed);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Name of the state being transitioned from
    pub from: String,
    /// Name of the state being transitioned to
    pub to: String,
    /// Name of the event that caused the transition
    pub event: String,
    /// Whether the variant changed
    pub kind: TransitionKind,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// Once `limit` records are held, recording a new one drops the oldest. A
/// limit of zero disables recording.
///
/// # Example
///
/// ```rust
/// use fsm_relay::core::{StateHistory, StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(StateTransition {
///     from: "Start".to_string(),
///     to: "Middle".to_string(),
///     event: "Step".to_string(),
///     kind: TransitionKind::Changed,
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: "Middle".to_string(),
///     to: "End".to_string(),
///     event: "Step".to_string(),
///     kind: TransitionKind::Changed,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec!["Start", "Middle", "End"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<StateTransition>,
    limit: usize,
}

impl StateHistory {
    /// Create an empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(1024)),
            limit,
        }
    }

    /// Whether records are being kept at all.
    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of state names traversed.
    ///
    /// Returns the `from` of the oldest record, then the `to` of each record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the oldest and newest record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
