//! State and event traits.
//!
//! States and events are identified by a closed, enumerated kind. The kind
//! is what the transition table is keyed on; the values themselves may carry
//! extra data that the table never inspects.

use std::fmt::Debug;
use std::hash::Hash;

/// Bounds shared by every state and event kind.
///
/// Kinds are small `Copy` tags (usually fieldless enums) so they can be used
/// directly as hash map keys.
pub trait Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Kind for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

/// Trait for state machine states.
///
/// A state is replaced, never mutated, on each transition. Methods are pure.
///
/// # Example
///
/// ```rust
/// use cadence::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum TaskState {
///     Pending,
///     Running,
///     Complete,
/// }
///
/// impl State for TaskState {
///     type Kind = Self;
///
///     fn kind(&self) -> Self {
///         *self
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///             Self::Complete => "Complete",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Complete)
///     }
/// }
///
/// assert_eq!(TaskState::Running.kind(), TaskState::Running);
/// assert!(TaskState::Complete.is_final());
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Tag used as the transition table key.
    type Kind: Kind;

    /// Get the kind of this state.
    fn kind(&self) -> Self::Kind;

    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Final states are informational only; the runtime still looks up
    /// transitions for them like any other state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Trait for events submitted to a machine.
///
/// Events are immutable triggers, consumed once dequeued.
pub trait Event: Debug + Send + Sync + 'static {
    /// Tag used as the transition table key.
    type Kind: Kind;

    /// Get the kind of this event.
    fn kind(&self) -> Self::Kind;

    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum Job {
        Queued,
        Running { worker: u32 },
        Done,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum JobKind {
        Queued,
        Running,
        Done,
    }

    impl State for Job {
        type Kind = JobKind;

        fn kind(&self) -> JobKind {
            match self {
                Self::Queued => JobKind::Queued,
                Self::Running { .. } => JobKind::Running,
                Self::Done => JobKind::Done,
            }
        }

        fn name(&self) -> &str {
            match self {
                Self::Queued => "Queued",
                Self::Running { .. } => "Running",
                Self::Done => "Done",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Done)
        }
    }

    #[derive(Debug)]
    struct Assign(u32);

    impl Event for Assign {
        type Kind = &'static str;

        fn kind(&self) -> &'static str {
            "Assign"
        }

        fn name(&self) -> &str {
            "Assign"
        }
    }

    #[test]
    fn kind_ignores_state_payload() {
        let a = Job::Running { worker: 1 };
        let b = Job::Running { worker: 2 };

        assert_ne!(a, b);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.name(), "Running");
    }

    #[test]
    fn is_final_defaults_per_state() {
        assert!(!Job::Queued.is_final());
        assert!(!Job::Running { worker: 3 }.is_final());
        assert!(Job::Done.is_final());
    }

    #[test]
    fn event_kind_is_stable() {
        let event = Assign(7);
        assert_eq!(event.kind(), Assign(8).kind());
        assert_eq!(event.name(), "Assign");
        assert_eq!(event.0, 7);
    }
}
