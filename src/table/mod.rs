//! Transition table: the immutable rules a machine runs on.
//!
//! A table maps `(state kind, event kind)` to exactly one [`Transition`].
//! Lookup is exact match only; there are no wildcard or any-state rules, so
//! every state registers its own handlers. Optional entry/exit hooks for a
//! state kind live next to the transitions as [`StateHooks`].
//!
//! Tables are built once through [`TransitionTableBuilder`] and never change
//! afterwards. A machine that needs different rules needs a new table.

mod builder;
mod error;

pub use builder::{TransitionBuilder, TransitionTableBuilder};
pub use error::{BuildError, TableError};

use crate::core::{Event, State};
use crate::hooks::Hook;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A rule mapping a `(state kind, event kind)` pair to a target state.
///
/// Each of the three transition-level hooks is optional.
pub struct Transition<S: State, E: Event, C> {
    pub from: S::Kind,
    pub event: E::Kind,
    pub to: S,
    pub on_exit: Option<Hook<C>>,
    pub action: Option<Hook<C>>,
    pub on_entry: Option<Hook<C>>,
}

impl<S: State, E: Event, C> Clone for Transition<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            event: self.event,
            to: self.to.clone(),
            on_exit: self.on_exit.as_ref().map(Arc::clone),
            action: self.action.as_ref().map(Arc::clone),
            on_entry: self.on_entry.as_ref().map(Arc::clone),
        }
    }
}

impl<S: State, E: Event, C> fmt::Debug for Transition<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("to", &self.to)
            .field("on_exit", &self.on_exit.is_some())
            .field("action", &self.action.is_some())
            .field("on_entry", &self.on_entry.is_some())
            .finish()
    }
}

/// Entry and exit hooks a state kind may carry.
pub struct StateHooks<C> {
    pub(crate) on_entry: Option<Hook<C>>,
    pub(crate) on_exit: Option<Hook<C>>,
}

impl<C> StateHooks<C> {
    pub fn new() -> Self {
        Self {
            on_entry: None,
            on_exit: None,
        }
    }

    /// Run `hook` whenever the machine enters this state.
    pub fn on_entry(mut self, hook: Hook<C>) -> Self {
        self.on_entry = Some(hook);
        self
    }

    /// Run `hook` whenever the machine leaves this state.
    pub fn on_exit(mut self, hook: Hook<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }

    pub fn entry(&self) -> Option<&Hook<C>> {
        self.on_entry.as_ref()
    }

    pub fn exit(&self) -> Option<&Hook<C>> {
        self.on_exit.as_ref()
    }
}

impl<C> Default for StateHooks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for StateHooks<C> {
    fn clone(&self) -> Self {
        Self {
            on_entry: self.on_entry.as_ref().map(Arc::clone),
            on_exit: self.on_exit.as_ref().map(Arc::clone),
        }
    }
}

impl<C> fmt::Debug for StateHooks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHooks")
            .field("on_entry", &self.on_entry.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Read-only mapping from state kind to event kind to transition.
///
/// # Example
///
/// ```rust
/// use cadence::table::{TransitionBuilder, TransitionTable};
/// use cadence::{event_enum, state_enum};
///
/// state_enum! {
///     enum Power { Idle, Running }
/// }
///
/// event_enum! {
///     enum Switch { Start, Stop }
/// }
///
/// let table: TransitionTable<Power, Switch, ()> = TransitionTable::builder()
///     .transition(TransitionBuilder::new().from(Power::Idle).on(Switch::Start).to(Power::Running))
///     .transition(TransitionBuilder::new().from(Power::Running).on(Switch::Stop).to(Power::Idle))
///     .build()
///     .unwrap();
///
/// assert_eq!(table.lookup(Power::Idle, Switch::Start).unwrap().to, Power::Running);
/// assert!(table.lookup(Power::Idle, Switch::Stop).is_none());
/// ```
pub struct TransitionTable<S: State, E: Event, C> {
    transitions: HashMap<S::Kind, HashMap<E::Kind, Transition<S, E, C>>>,
    state_hooks: HashMap<S::Kind, StateHooks<C>>,
}

impl<S: State, E: Event, C> TransitionTable<S, E, C> {
    pub fn builder() -> TransitionTableBuilder<S, E, C> {
        TransitionTableBuilder::new()
    }

    /// Find the transition registered for `(state, event)`.
    pub fn lookup(&self, state: S::Kind, event: E::Kind) -> Option<&Transition<S, E, C>> {
        self.transitions.get(&state)?.get(&event)
    }

    /// Entry/exit hooks registered for a state kind.
    pub fn state_hooks(&self, state: S::Kind) -> Option<&StateHooks<C>> {
        self.state_hooks.get(&state)
    }

    /// Event kinds accepted while in `state`.
    pub fn events_for(&self, state: S::Kind) -> Vec<E::Kind> {
        self.transitions
            .get(&state)
            .map(|by_event| by_event.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of registered transitions.
    pub fn len(&self) -> usize {
        self.transitions.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: State, E: Event, C> fmt::Debug for TransitionTable<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("transitions", &self.transitions)
            .field("state_hooks", &self.state_hooks)
            .finish()
    }
}
