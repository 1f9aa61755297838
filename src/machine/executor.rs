//! Transition executor: runs the hook pipeline for one event.

use crate::core::{Event, MachineId, State, TransitionRecord};
use crate::hooks::{Hook, HookError, HookStage};
use crate::machine::{InvalidEventHandler, Outcome};
use crate::table::TransitionTable;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Owns the machine's current state and context.
///
/// Only the dispatcher drives an executor, one event at a time, so the
/// state/context pair is never observed half-updated by another transition.
pub(crate) struct Executor<S: State, E: Event, C> {
    id: MachineId,
    state: S,
    current: watch::Sender<S>,
    context: C,
    table: Arc<TransitionTable<S, E, C>>,
    on_invalid: InvalidEventHandler<S, E>,
    hook_timeout: Option<Duration>,
    applied: u64,
}

impl<S, E, C> Executor<S, E, C>
where
    S: State,
    E: Event,
    C: Clone + Send + 'static,
{
    pub(crate) fn new(
        id: MachineId,
        state: S,
        current: watch::Sender<S>,
        context: C,
        table: Arc<TransitionTable<S, E, C>>,
        on_invalid: InvalidEventHandler<S, E>,
        hook_timeout: Option<Duration>,
    ) -> Self {
        Self {
            id,
            state,
            current,
            context,
            table,
            on_invalid,
            hook_timeout,
            applied: 0,
        }
    }

    pub(crate) fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn into_context(self) -> C {
        self.context
    }

    /// Resolve one event against the current state.
    ///
    /// Hooks run in this order, each free to replace the context:
    /// transition-exit, state-exit, transition-action, state switch,
    /// transition-entry, state-entry.
    pub(crate) async fn execute(&mut self, event: &E) -> Outcome<S> {
        let table = Arc::clone(&self.table);
        let Some(transition) = table.lookup(self.state.kind(), event.kind()) else {
            let handler = AssertUnwindSafe(|| (self.on_invalid)(&self.state, event));
            if std::panic::catch_unwind(handler).is_err() {
                tracing::error!(
                    event = event.name(),
                    state = self.state.name(),
                    "invalid-event handler panicked"
                );
            }
            return Outcome::Rejected {
                state: self.state.clone(),
                event: event.name().to_string(),
            };
        };

        let from = self.state.clone();
        let exit_hook = table.state_hooks(from.kind()).and_then(|h| h.exit());
        let entry_hook = table
            .state_hooks(transition.to.kind())
            .and_then(|h| h.entry());

        let pipeline = async {
            self.run_hook(HookStage::TransitionExit, transition.on_exit.as_ref())
                .await?;
            self.run_hook(HookStage::StateExit, exit_hook).await?;
            self.run_hook(HookStage::TransitionAction, transition.action.as_ref())
                .await?;

            self.state = transition.to.clone();
            self.current.send_replace(self.state.clone());
            tracing::trace!(state = self.state.name(), "state switched");

            self.run_hook(HookStage::TransitionEntry, transition.on_entry.as_ref())
                .await?;
            self.run_hook(HookStage::StateEntry, entry_hook).await?;
            Ok::<(), (HookStage, HookError)>(())
        };

        if let Err((stage, error)) = pipeline.await {
            tracing::error!(
                event = event.name(),
                state = self.state.name(),
                %stage,
                %error,
                "hook failed, transition aborted"
            );
            return Outcome::Failed { stage, error };
        }

        self.applied += 1;
        tracing::info!(
            from = from.name(),
            to = self.state.name(),
            event = event.name(),
            sequence = self.applied,
            "transition applied"
        );

        Outcome::Transitioned(TransitionRecord {
            machine: self.id,
            sequence: self.applied,
            from,
            to: self.state.clone(),
            event: event.name().to_string(),
            completed_at: Utc::now(),
        })
    }

    async fn run_hook(
        &mut self,
        stage: HookStage,
        hook: Option<&Hook<C>>,
    ) -> Result<(), (HookStage, HookError)> {
        let Some(hook) = hook else {
            return Ok(());
        };
        tracing::trace!(%stage, "running hook");

        let context = self.context.clone();
        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| hook(context))) {
            Ok(future) => future,
            Err(_) => return Err((stage, HookError::Panicked)),
        };
        let guarded = AssertUnwindSafe(future).catch_unwind();

        let result = match self.hook_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, guarded).await {
                Ok(result) => result,
                Err(_) => return Err((stage, HookError::TimedOut { timeout })),
            },
            None => guarded.await,
        };

        match result {
            Ok(Ok(Some(replacement))) => {
                self.context = replacement;
                Ok(())
            }
            Ok(Ok(None)) => Ok(()),
            Ok(Err(error)) => Err((stage, error)),
            Err(_) => Err((stage, HookError::Panicked)),
        }
    }
}
