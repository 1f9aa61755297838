//! The machine runtime: event queue, transition execution and notifications.
//!
//! A [`Machine`] owns a dedicated dispatcher task. That task is the only
//! owner of the current state, the context and the pending event queue, so
//! no two transitions can ever run concurrently:
//!
//! 1. callers [`enqueue`](MachineHandle::enqueue) events (fire-and-forget)
//! 2. the dispatcher takes the oldest event and runs its transition's hooks
//! 3. on success the new state is published to every subscriber
//! 4. only then is the next event looked at
//!
//! Events without a matching transition are handed to the invalid-event
//! handler and leave the machine untouched.
//!
//! # Example
//!
//! ```rust
//! use cadence::machine::{Machine, MachineError};
//! use cadence::table::{TransitionBuilder, TransitionTable};
//! use cadence::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Power { Idle, Running }
//! }
//!
//! event_enum! {
//!     enum Switch { Start, Stop }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), MachineError> {
//! let table: TransitionTable<Power, Switch, ()> = TransitionTable::builder()
//!     .transition(TransitionBuilder::new().from(Power::Idle).on(Switch::Start).to(Power::Running))
//!     .transition(TransitionBuilder::new().from(Power::Running).on(Switch::Stop).to(Power::Idle))
//!     .build()
//!     .unwrap();
//!
//! let machine = Machine::new((), Power::Idle, table);
//! let mut changes = machine.subscribe()?;
//!
//! machine.enqueue(Switch::Start)?;
//! machine.enqueue(Switch::Stop)?;
//!
//! assert_eq!(changes.recv().await, Some(Power::Running));
//! assert_eq!(changes.recv().await, Some(Power::Idle));
//!
//! machine.close().await?;
//! assert_eq!(changes.recv().await, None);
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatcher;
mod error;
mod executor;
mod notifier;

pub use config::{ConfigError, MachineConfig};
pub use error::MachineError;
pub use notifier::Subscription;

use crate::core::{Event, MachineId, State, TransitionRecord};
use crate::hooks::{HookError, HookStage};
use crate::table::TransitionTable;
use dispatcher::{Command, Dispatcher};
use executor::Executor;
use notifier::Notifier;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Callback invoked for events that have no transition in the current state.
pub type InvalidEventHandler<S, E> = Arc<dyn Fn(&S, &E) + Send + Sync>;

/// Default invalid-event handler: emits a warning naming the event and the
/// state it was rejected in.
pub fn log_rejection<S: State, E: Event>(state: &S, event: &E) {
    tracing::warn!(
        event = event.name(),
        state = state.name(),
        "no transition for event {} in state {}",
        event.name(),
        state.name()
    );
}

/// How a single event resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<S> {
    /// The transition ran to completion and its target was published
    Transitioned(TransitionRecord<S>),

    /// No transition matched; state and context are unchanged
    Rejected { state: S, event: String },

    /// A hook failed; the rest of the transition was skipped and nothing
    /// was published
    Failed { stage: HookStage, error: HookError },
}

impl<S> Outcome<S> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }

    /// Target state, if the transition was applied.
    pub fn target(&self) -> Option<&S> {
        match self {
            Self::Transitioned(record) => Some(&record.to),
            _ => None,
        }
    }
}

/// Cloneable access to a running machine.
///
/// Handles can be moved into hooks to enqueue follow-up events; those events
/// are queued behind the transition currently running.
pub struct MachineHandle<S: State, E: Event> {
    id: MachineId,
    queue: mpsc::UnboundedSender<Command<S, E>>,
    notifier: Notifier<S>,
    current: watch::Receiver<S>,
    processing: Arc<AtomicBool>,
}

impl<S: State, E: Event> Clone for MachineHandle<S, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            queue: self.queue.clone(),
            notifier: self.notifier.clone(),
            current: self.current.clone(),
            processing: Arc::clone(&self.processing),
        }
    }
}

impl<S: State, E: Event> MachineHandle<S, E> {
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Append `event` to the queue and return immediately.
    ///
    /// Fails only once the machine has been closed.
    pub fn enqueue(&self, event: E) -> Result<(), MachineError> {
        tracing::debug!(machine = %self.id, event = event.name(), "event enqueued");
        self.queue
            .send(Command::Event { event, ack: None })
            .map_err(|_| MachineError::Closed)
    }

    /// Enqueue `event` and wait until it has fully resolved.
    ///
    /// Awaiting this from inside a hook deadlocks: the event cannot start
    /// before the running transition finishes. Use [`enqueue`](Self::enqueue)
    /// there.
    pub async fn dispatch(&self, event: E) -> Result<Outcome<S>, MachineError> {
        let (ack, outcome) = oneshot::channel();
        self.queue
            .send(Command::Event {
                event,
                ack: Some(ack),
            })
            .map_err(|_| MachineError::Closed)?;
        outcome.await.map_err(|_| MachineError::Closed)
    }

    /// Receive every state published from now on.
    pub fn subscribe(&self) -> Result<Subscription<S>, MachineError> {
        self.notifier.subscribe().ok_or(MachineError::Closed)
    }

    /// The state the machine is in right now.
    ///
    /// This changes at the state switch, before the entry hooks run and
    /// before subscribers are notified. A transition that fails after the
    /// switch leaves the machine in its target state without a notification.
    pub fn state(&self) -> S {
        self.current.borrow().clone()
    }

    /// Whether a transition is in flight right now.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed() || self.notifier.is_closed()
    }

    /// Number of live subscriptions, as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

/// A running state machine.
///
/// Dereferences to [`MachineHandle`] for enqueueing and subscribing.
/// [`close`](Self::close) consumes the machine, so it can only happen once.
///
/// Dropping a machine without closing it requests the same shutdown: queued
/// events still resolve, then the dispatcher stops and the final context is
/// discarded. Outstanding handles, including ones captured by hooks, do not
/// keep the dispatcher alive.
pub struct Machine<S: State, E: Event, C> {
    handle: MachineHandle<S, E>,
    task: Option<JoinHandle<C>>,
}

impl<S, E, C> Machine<S, E, C>
where
    S: State,
    E: Event,
    C: Clone + Send + 'static,
{
    /// Start a machine with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new(context: C, state: S, table: TransitionTable<S, E, C>) -> Self {
        Self::builder(context, state, table).spawn()
    }

    pub fn builder(context: C, state: S, table: TransitionTable<S, E, C>) -> MachineBuilder<S, E, C> {
        MachineBuilder::new(context, state, table)
    }

    pub fn handle(&self) -> MachineHandle<S, E> {
        self.handle.clone()
    }

    /// Stop the machine and return its final context.
    ///
    /// Events enqueued before this call still resolve; later ones are
    /// dropped. Subscribers see their stream end.
    pub async fn close(mut self) -> Result<C, MachineError> {
        tracing::debug!(machine = %self.handle.id, "closing");
        self.request_close();
        let Some(task) = self.task.take() else {
            return Err(MachineError::Closed);
        };
        Ok(task.await?)
    }
}

impl<S: State, E: Event, C> Machine<S, E, C> {
    fn request_close(&self) {
        if self.handle.queue.send(Command::Close).is_err() {
            tracing::debug!(machine = %self.handle.id, "dispatcher already stopped");
        }
    }
}

impl<S: State, E: Event, C> Drop for Machine<S, E, C> {
    fn drop(&mut self) {
        if self.task.is_some() {
            tracing::debug!(machine = %self.handle.id, "dropped without close");
            self.request_close();
        }
    }
}

impl<S: State, E: Event, C> Deref for Machine<S, E, C> {
    type Target = MachineHandle<S, E>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

/// Builder for machines that need a custom configuration or
/// invalid-event handler.
pub struct MachineBuilder<S: State, E: Event, C> {
    context: C,
    state: S,
    table: TransitionTable<S, E, C>,
    config: MachineConfig,
    on_invalid: InvalidEventHandler<S, E>,
}

impl<S, E, C> MachineBuilder<S, E, C>
where
    S: State,
    E: Event,
    C: Clone + Send + 'static,
{
    pub fn new(context: C, state: S, table: TransitionTable<S, E, C>) -> Self {
        Self {
            context,
            state,
            table,
            config: MachineConfig::default(),
            on_invalid: Arc::new(log_rejection::<S, E>),
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default invalid-event handler.
    pub fn on_invalid_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, &E) + Send + Sync + 'static,
    {
        self.on_invalid = Arc::new(handler);
        self
    }

    /// Spawn the dispatcher task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn(self) -> Machine<S, E, C> {
        let id = MachineId::new();
        let span = tracing::info_span!("machine", %id, name = %self.config.name);
        let notifier = Notifier::new();
        let (current, watched) = watch::channel(self.state.clone());
        let (queue, pending) = mpsc::unbounded_channel();
        let processing = Arc::new(AtomicBool::new(false));

        let executor = Executor::new(
            id,
            self.state,
            current,
            self.context,
            Arc::new(self.table),
            self.on_invalid,
            self.config.hook_timeout(),
        );
        let dispatcher = Dispatcher::new(pending, executor, notifier.clone(), Arc::clone(&processing));
        let task = tokio::spawn(dispatcher.run().instrument(span));

        Machine {
            handle: MachineHandle {
                id,
                queue,
                notifier,
                current: watched,
                processing,
            },
            task: Some(task),
        }
    }
}
