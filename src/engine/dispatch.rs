//! The queued dispatch core: one worker thread per engine.

use super::error::{EngineError, Fault, FaultCause};
use super::machine::{Event, StateMachine, Transition};
use crate::config::EngineConfig;
use crate::core::{State, StateHistory, StateTransition, TransitionKind};
use chrono::Utc;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, debug_span, trace, warn};
use uuid::Uuid;

/// What a hook sees of the machine it runs in.
pub struct Context<'a, M: StateMachine> {
    machine: &'a M,
    pending: &'a mut VecDeque<M::Event>,
}

impl<'a, M: StateMachine> Context<'a, M> {
    pub(crate) fn new(machine: &'a M, pending: &'a mut VecDeque<M::Event>) -> Self {
        Self { machine, pending }
    }

    /// The machine definition.
    pub fn machine(&self) -> &'a M {
        self.machine
    }

    /// Queue an event on this machine.
    ///
    /// Emitted events run to completion, in emission order, before the engine
    /// takes the next event from its queue.
    pub fn emit(&mut self, event: M::Event) {
        self.pending.push_back(event);
    }
}

struct Inbox<E> {
    events: VecDeque<E>,
    in_flight: bool,
    terminated: bool,
}

struct Shared<M: StateMachine> {
    inbox: Mutex<Inbox<M::Event>>,
    ready: Condvar,
    idle: Condvar,
    state_name: Mutex<&'static str>,
    faults: Mutex<Vec<Fault<M::Error>>>,
    history: Mutex<StateHistory>,
}

impl<M: StateMachine> Shared<M> {
    fn new(state_name: &'static str, history_limit: usize) -> Self {
        Self {
            inbox: Mutex::new(Inbox {
                events: VecDeque::new(),
                in_flight: false,
                terminated: false,
            }),
            ready: Condvar::new(),
            idle: Condvar::new(),
            state_name: Mutex::new(state_name),
            faults: Mutex::new(Vec::new()),
            history: Mutex::new(StateHistory::with_limit(history_limit)),
        }
    }

    fn push(&self, event: M::Event) {
        let mut inbox = self.inbox.lock();
        if inbox.terminated {
            debug!(event = event.name(), "event dropped, engine is shutting down");
            return;
        }
        inbox.events.push_back(event);
        drop(inbox);
        self.ready.notify_one();
    }

    /// Blocks until an event is available; `None` once terminated.
    fn next(&self) -> Option<M::Event> {
        let mut inbox = self.inbox.lock();
        loop {
            if inbox.terminated {
                return None;
            }
            if let Some(event) = inbox.events.pop_front() {
                inbox.in_flight = true;
                return Some(event);
            }
            self.ready.wait(&mut inbox);
        }
    }

    fn retire(&self) {
        let mut inbox = self.inbox.lock();
        inbox.in_flight = false;
        if inbox.events.is_empty() {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut inbox = self.inbox.lock();
        while !inbox.terminated && (inbox.in_flight || !inbox.events.is_empty()) {
            self.idle.wait(&mut inbox);
        }
    }

    fn terminate(&self) {
        self.inbox.lock().terminated = true;
        self.ready.notify_all();
        self.idle.notify_all();
    }

    fn is_terminated(&self) -> bool {
        self.inbox.lock().terminated
    }
}

/// Enqueue-only reference to an engine.
///
/// Handles are what a nested machine keeps of its parent: enough to push
/// events, nothing more. Events sent after the engine was dropped are
/// discarded.
pub struct Handle<M: StateMachine> {
    shared: Arc<Shared<M>>,
}

impl<M: StateMachine> Handle<M> {
    pub fn enqueue(&self, event: M::Event) {
        self.shared.push(event);
    }
}

impl<M: StateMachine> Clone for Handle<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Runs a [`StateMachine`] on a dedicated worker thread.
///
/// All transitions and hooks of one engine execute serially on its worker.
/// Producers may enqueue from any thread. Dropping the engine stops the worker
/// after the event in flight, and joins it.
pub struct Engine<M: StateMachine> {
    id: Uuid,
    machine: Arc<M>,
    shared: Arc<Shared<M>>,
    config: EngineConfig,
    worker: Option<JoinHandle<()>>,
}

impl<M: StateMachine> Engine<M> {
    /// Start an engine with default settings.
    pub fn new(machine: M) -> Result<Self, EngineError> {
        Self::with_config(machine, EngineConfig::default())
    }

    /// Start an engine.
    pub fn with_config(machine: M, config: EngineConfig) -> Result<Self, EngineError> {
        if config.thread_name.contains('\0') {
            return Err(EngineError::InvalidThreadName(config.thread_name));
        }
        let id = Uuid::new_v4();
        let machine = Arc::new(machine);
        let current = machine.initial_state();
        let shared = Arc::new(Shared::new(current.name(), config.history_limit));

        let worker = Worker {
            id,
            machine: Arc::clone(&machine),
            shared: Arc::clone(&shared),
            current,
        };
        let mut thread_name = format!("{}-{}", config.thread_name, id.simple());
        thread_name.truncate(config.thread_name.len() + 9);
        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())
            .map_err(EngineError::Spawn)?;

        Ok(Self {
            id,
            machine,
            shared,
            config,
            worker: Some(handle),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The machine definition shared with the worker.
    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn handle(&self) -> Handle<M> {
        Handle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Append an event to the tail of the queue.
    pub fn enqueue(&self, event: M::Event) {
        self.shared.push(event);
    }

    /// Block until the queue is empty and no event is being processed.
    ///
    /// Must not be called from one of this engine's own hooks.
    pub fn wait_until_queue_empty(&self) {
        self.shared.wait_idle();
    }

    /// Call `callback` on a watcher thread once the current state is named
    /// `name`. The caller is never blocked.
    ///
    /// The watcher samples the state every `poll_interval` and gives up
    /// silently when the engine is dropped first.
    pub fn wait_until_state<F>(&self, name: &'static str, callback: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        let interval = self.config.poll_interval;
        thread::spawn(move || {
            while *shared.state_name.lock() != name {
                if shared.is_terminated() {
                    return;
                }
                thread::sleep(interval);
            }
            callback();
        })
    }

    /// Name of the current state as of the last completed dispatch.
    pub fn state_name(&self) -> &'static str {
        *self.shared.state_name.lock()
    }

    /// Drain the failures recorded since the last call.
    pub fn take_faults(&self) -> Vec<Fault<M::Error>> {
        mem::take(&mut *self.shared.faults.lock())
    }

    /// Snapshot of the transition history.
    pub fn history(&self) -> StateHistory {
        self.shared.history.lock().clone()
    }
}

impl<M: StateMachine> Drop for Engine<M> {
    fn drop(&mut self) {
        self.shared.terminate();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(id = %self.id, "worker thread panicked");
            }
        }
    }
}

struct Worker<M: StateMachine> {
    id: Uuid,
    machine: Arc<M>,
    shared: Arc<Shared<M>>,
    current: M::State,
}

impl<M: StateMachine> Worker<M> {
    fn run(mut self) {
        let span = debug_span!("machine", id = %self.id, kind = std::any::type_name::<M>());
        let _entered = span.enter();
        trace!(state = self.current.name(), "worker started");

        while let Some(event) = self.shared.next() {
            let mut pending = VecDeque::from([event]);
            while let Some(event) = pending.pop_front() {
                if self.shared.is_terminated() {
                    break;
                }
                self.dispatch(event, &mut pending);
            }
            self.shared.retire();
        }

        trace!("worker stopped");
    }

    fn dispatch(&mut self, event: M::Event, pending: &mut VecDeque<M::Event>) {
        let state = self.current.name();
        let event_name = event.name();
        let machine = &*self.machine;
        let current = &mut self.current;
        let history = &self.shared.history;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            step(machine, current, event, pending, history)
        }));
        *self.shared.state_name.lock() = self.current.name();

        let cause = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(error)) => FaultCause::Hook(error),
            Err(payload) => FaultCause::Panic(panic_message(payload)),
        };
        let fault = Fault {
            state,
            event: event_name,
            cause,
        };
        warn!(%fault, "event failed");
        self.shared.faults.lock().push(fault);
    }
}

fn step<M: StateMachine>(
    machine: &M,
    current: &mut M::State,
    event: M::Event,
    pending: &mut VecDeque<M::Event>,
    history: &Mutex<StateHistory>,
) -> Result<(), M::Error> {
    let event_name = event.name();
    let candidate = match machine.on_event(current, event) {
        Transition::Next(state) => state,
        Transition::Ignore => return Ok(()),
    };

    let mut cx = Context::new(machine, pending);
    if mem::discriminant(&candidate) == mem::discriminant(&*current) {
        record::<M>(history, current, &candidate, event_name, TransitionKind::Reentered);
        *current = candidate;
        current.reenter(&mut cx)
    } else {
        current.leave(&mut cx)?;
        record::<M>(history, current, &candidate, event_name, TransitionKind::Changed);
        *current = candidate;
        if current.is_error() {
            debug!(state = current.name(), "entering error state");
        }
        current.enter(&mut cx)
    }
}

fn record<M: StateMachine>(
    history: &Mutex<StateHistory>,
    from: &M::State,
    to: &M::State,
    event: &'static str,
    kind: TransitionKind,
) {
    trace!(from = from.name(), to = to.name(), event, ?kind, "transition");
    let mut history = history.lock();
    if history.is_enabled() {
        history.record(StateTransition {
            from: from.name().to_string(),
            to: to.name().to_string(),
            event: event.to_string(),
            kind,
            timestamp: Utc::now(),
        });
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
