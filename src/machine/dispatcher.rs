//! Event queue and dispatch loop.
//!
//! The dispatcher is the only task that touches the executor. Events wait in
//! a single-consumer queue and are resolved strictly one at a time, in the
//! order they were enqueued: an event submitted while a transition is in
//! flight (including from inside one of its hooks) only appends to the queue.

use crate::core::{Event, State};
use crate::machine::executor::Executor;
use crate::machine::notifier::Notifier;
use crate::machine::Outcome;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Messages accepted by the dispatch loop.
pub(crate) enum Command<S, E> {
    Event {
        event: E,
        ack: Option<oneshot::Sender<Outcome<S>>>,
    },
    Close,
}

/// Sets the processing flag for its lifetime.
///
/// The flag is cleared on drop, so it never stays set after a failed or
/// panicking transition.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Closes the notifier when dropped, including while the dispatcher task
/// unwinds, so subscribers always see their stream end.
struct CloseOnDrop<S>(Notifier<S>);

impl<S> Drop for CloseOnDrop<S> {
    fn drop(&mut self) {
        if self.0.close() {
            tracing::warn!("dispatcher stopped without a close, notifier closed");
        }
    }
}

pub(crate) struct Dispatcher<S: State, E: Event, C> {
    queue: mpsc::UnboundedReceiver<Command<S, E>>,
    executor: Executor<S, E, C>,
    notifier: Notifier<S>,
    processing: Arc<AtomicBool>,
}

impl<S, E, C> Dispatcher<S, E, C>
where
    S: State,
    E: Event,
    C: Clone + Send + 'static,
{
    pub(crate) fn new(
        queue: mpsc::UnboundedReceiver<Command<S, E>>,
        executor: Executor<S, E, C>,
        notifier: Notifier<S>,
        processing: Arc<AtomicBool>,
    ) -> Self {
        Self {
            queue,
            executor,
            notifier,
            processing,
        }
    }

    /// Drain the queue until closed, then hand back the final context.
    pub(crate) async fn run(mut self) -> C {
        tracing::debug!(state = self.executor.state().name(), "dispatcher started");
        let _closer = CloseOnDrop(self.notifier.clone());

        while let Some(command) = self.queue.recv().await {
            match command {
                Command::Event { event, ack } => {
                    let outcome = self.process(&event).await;
                    if let Some(ack) = ack {
                        // The caller may have stopped waiting.
                        let _ = ack.send(outcome);
                    }
                }
                Command::Close => {
                    tracing::debug!("close requested");
                    break;
                }
            }
        }

        self.queue.close();
        let mut dropped = 0usize;
        while let Ok(command) = self.queue.try_recv() {
            if let Command::Event { event, .. } = command {
                tracing::debug!(event = event.name(), "dropping event queued after close");
                dropped += 1;
            }
        }

        self.notifier.close();
        tracing::debug!(
            state = self.executor.state().name(),
            dropped,
            "dispatcher stopped"
        );
        self.executor.into_context()
    }

    async fn process(&mut self, event: &E) -> Outcome<S> {
        let _processing = ProcessingGuard::set(&self.processing);
        tracing::debug!(event = event.name(), "event dequeued");

        let outcome = self.executor.execute(event).await;
        if let Outcome::Transitioned(record) = &outcome {
            let reached = self.notifier.publish(&record.to);
            tracing::trace!(state = record.to.name(), subscribers = reached, "published");
        }
        outcome
    }
}
