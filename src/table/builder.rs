//! Builders for transitions and transition tables.

use crate::core::{Event, State};
use crate::hooks::Hook;
use crate::table::error::{BuildError, TableError};
use crate::table::{StateHooks, Transition, TransitionTable};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State, E: Event, C> {
    from: Option<S::Kind>,
    event: Option<E::Kind>,
    to: Option<S>,
    on_exit: Option<Hook<C>>,
    action: Option<Hook<C>>,
    on_entry: Option<Hook<C>>,
}

impl<S: State, E: Event, C> TransitionBuilder<S, E, C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            on_exit: None,
            action: None,
            on_entry: None,
        }
    }

    /// Set the source state kind (required).
    pub fn from(mut self, state: S::Kind) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering event kind (required).
    pub fn on(mut self, event: E::Kind) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Hook run first, while still in the source state.
    pub fn on_exit(mut self, hook: Hook<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }

    /// Hook run between the source state's exit and the state switch.
    pub fn action(mut self, hook: Hook<C>) -> Self {
        self.action = Some(hook);
        self
    }

    /// Hook run right after the state switch, before the target's entry hook.
    pub fn on_entry(mut self, hook: Hook<C>) -> Self {
        self.on_entry = Some(hook);
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, E, C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingTarget)?;

        Ok(Transition {
            from,
            event,
            to,
            on_exit: self.on_exit,
            action: self.action,
            on_entry: self.on_entry,
        })
    }
}

impl<S: State, E: Event, C> Default for TransitionBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing transition tables.
///
/// Problems are not reported one at a time: [`build`](Self::build) checks
/// every registered transition and state and returns all violations
/// together.
pub struct TransitionTableBuilder<S: State, E: Event, C> {
    transitions: Vec<TransitionBuilder<S, E, C>>,
    states: Vec<(S::Kind, StateHooks<C>)>,
}

impl<S: State, E: Event, C> TransitionTableBuilder<S, E, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Register a transition.
    pub fn transition(mut self, builder: TransitionBuilder<S, E, C>) -> Self {
        self.transitions.push(builder);
        self
    }

    /// Register entry/exit hooks for a state kind.
    pub fn state(mut self, kind: S::Kind, hooks: StateHooks<C>) -> Self {
        self.states.push((kind, hooks));
        self
    }

    /// Validate and build the table.
    pub fn build(self) -> Result<TransitionTable<S, E, C>, TableError> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();
        let mut transitions: HashMap<S::Kind, HashMap<E::Kind, Transition<S, E, C>>> =
            HashMap::new();
        let mut state_hooks = HashMap::new();

        for builder in self.transitions {
            let check = match builder.build() {
                Ok(transition) => match transitions
                    .entry(transition.from)
                    .or_default()
                    .entry(transition.event)
                {
                    Entry::Occupied(_) => Validation::fail(BuildError::DuplicateTransition {
                        state: format!("{:?}", transition.from),
                        event: format!("{:?}", transition.event),
                    }),
                    Entry::Vacant(slot) => {
                        slot.insert(transition);
                        Validation::success(())
                    }
                },
                Err(err) => Validation::fail(err),
            };
            checks.push(check);
        }

        let mut seen = HashSet::new();
        for (kind, hooks) in self.states {
            let check = if seen.insert(kind) {
                state_hooks.insert(kind, hooks);
                Validation::success(())
            } else {
                Validation::fail(BuildError::DuplicateStateHooks {
                    state: format!("{:?}", kind),
                })
            };
            checks.push(check);
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(TransitionTable {
                transitions,
                state_hooks,
            }),
            Validation::Failure(errors) => Err(TableError {
                errors: errors.iter().cloned().collect(),
            }),
        }
    }
}

impl<S: State, E: Event, C> Default for TransitionTableBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}
