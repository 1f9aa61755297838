//! State-change notifications.
//!
//! Fan-out to every registered subscriber, with no replay for subscribers
//! that join later.

use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

struct Inner<S> {
    subscribers: Vec<mpsc::UnboundedSender<S>>,
    closed: bool,
}

/// Broadcast channel of published states.
///
/// Cloning shares the same set of subscribers.
pub(crate) struct Notifier<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Notifier<S> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                subscribers: Vec::new(),
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber. Returns `None` once closed.
    pub(crate) fn subscribe(&self) -> Option<Subscription<S>> {
        let mut inner = self.lock();
        if inner.closed {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        inner.subscribers.push(tx);
        Some(Subscription { rx })
    }

    /// Close the channel. Subscribers see the end of their stream.
    ///
    /// Returns `false` if the channel was already closed.
    pub(crate) fn close(&self) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        inner.subscribers.clear();
        true
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl<S: Clone> Notifier<S> {
    /// Deliver `state` to every current subscriber.
    ///
    /// Subscribers that dropped their end are pruned. Returns the number of
    /// subscribers reached; publishing after close reaches nobody.
    pub(crate) fn publish(&self, state: &S) -> usize {
        let mut inner = self.lock();
        if inner.closed {
            return 0;
        }
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
        inner.subscribers.len()
    }
}

/// A stream of states published after the subscription was taken.
///
/// Ends (yields `None`) when the machine is closed.
#[derive(Debug)]
pub struct Subscription<S> {
    rx: mpsc::UnboundedReceiver<S>,
}

impl<S> Subscription<S> {
    /// Wait for the next published state.
    pub async fn recv(&mut self) -> Option<S> {
        self.rx.recv().await
    }

    /// Take an already delivered state without waiting.
    pub fn try_recv(&mut self) -> Option<S> {
        self.rx.try_recv().ok()
    }
}

impl<S> Stream for Subscription<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn publish_fans_out_to_all_subscribers() {
        let notifier = Notifier::new();
        let mut a = notifier.subscribe().unwrap();
        let mut b = notifier.subscribe().unwrap();

        assert_eq!(notifier.publish(&"Running"), 2);

        assert_eq!(a.recv().await, Some("Running"));
        assert_eq!(b.recv().await, Some("Running"));
    }

    #[tokio::test]
    async fn late_subscribers_get_no_replay() {
        let notifier = Notifier::<u8>::new();
        notifier.publish(&1);

        let mut late = notifier.subscribe().unwrap();
        assert_eq!(late.try_recv(), None);

        notifier.publish(&2);
        assert_eq!(late.recv().await, Some(2));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let notifier = Notifier::<u8>::new();
        let keep = notifier.subscribe().unwrap();
        drop(notifier.subscribe().unwrap());

        assert_eq!(notifier.publish(&1), 1);
        assert_eq!(notifier.subscriber_count(), 1);
        drop(keep);
    }

    #[tokio::test]
    async fn close_completes_subscribers() {
        let notifier = Notifier::<u8>::new();
        let sub = notifier.subscribe().unwrap();
        notifier.publish(&3);

        assert!(notifier.close());
        assert!(notifier.is_closed());

        let received: Vec<u8> = sub.collect().await;
        assert_eq!(received, vec![3]);
    }

    #[test]
    fn double_close_is_a_no_op() {
        let notifier = Notifier::<u8>::new();

        assert!(notifier.close());
        assert!(!notifier.close());
        assert!(notifier.subscribe().is_none());
        assert_eq!(notifier.publish(&9), 0);
    }
}
