//! Lifecycle hooks run around each transition.
//!
//! A hook receives the current context and may perform asynchronous work
//! before yielding its result:
//!
//! - `Ok(Some(context))` replaces the machine's context
//! - `Ok(None)` leaves the context unchanged
//! - `Err(error)` aborts the rest of the transition
//!
//! Hooks of one transition never run concurrently with each other or with
//! any other transition.

mod error;

pub use error::HookError;

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Result produced by a hook.
pub type HookResult<C> = Result<Option<C>, HookError>;

/// Future returned by a hook invocation.
pub type HookFuture<C> = BoxFuture<'static, HookResult<C>>;

/// Shared, type-erased hook.
pub type Hook<C> = Arc<dyn Fn(C) -> HookFuture<C> + Send + Sync>;

/// Create a hook from an async closure.
///
/// # Example
///
/// ```rust
/// use cadence::hooks::{hook, Hook};
/// use std::time::Duration;
///
/// let warm_up: Hook<u32> = hook(|attempts: u32| async move {
///     tokio::time::sleep(Duration::from_millis(1)).await;
///     Ok(Some(attempts + 1))
/// });
/// ```
pub fn hook<C, F, Fut>(f: F) -> Hook<C>
where
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult<C>> + Send + 'static,
{
    Arc::new(move |context| f(context).boxed())
}

/// Create a hook from a synchronous closure that cannot fail.
///
/// # Example
///
/// ```rust
/// use cadence::hooks::{sync_hook, Hook};
///
/// let reset: Hook<Vec<String>> = sync_hook(|_log| Some(Vec::new()));
/// let observe: Hook<Vec<String>> = sync_hook(|_log| None);
/// ```
pub fn sync_hook<C, F>(f: F) -> Hook<C>
where
    C: Send + 'static,
    F: Fn(C) -> Option<C> + Send + Sync + 'static,
{
    Arc::new(move |context| {
        let replacement = f(context);
        futures::future::ready(Ok(replacement)).boxed()
    })
}

/// Position of a hook in the transition pipeline.
///
/// Variants are declared in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookStage {
    /// Bound to the transition, runs while still in the old state
    TransitionExit,
    /// The old state's exit hook
    StateExit,
    /// Bridge logic between old and new state
    TransitionAction,
    /// Bound to the transition, runs after the state switch
    TransitionEntry,
    /// The new state's entry hook
    StateEntry,
}

impl HookStage {
    /// All stages in execution order.
    pub const ORDER: [HookStage; 5] = [
        HookStage::TransitionExit,
        HookStage::StateExit,
        HookStage::TransitionAction,
        HookStage::TransitionEntry,
        HookStage::StateEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransitionExit => "transition-exit",
            Self::StateExit => "state-exit",
            Self::TransitionAction => "transition-action",
            Self::TransitionEntry => "transition-entry",
            Self::StateEntry => "state-entry",
        }
    }

    /// Whether this stage runs after the state switch.
    pub fn after_switch(&self) -> bool {
        matches!(self, Self::TransitionEntry | Self::StateEntry)
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
