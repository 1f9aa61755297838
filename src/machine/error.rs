//! Machine error types.

use thiserror::Error;

/// Errors surfaced to callers of a machine.
///
/// Rejected events and failing hooks are not errors here; they are reported
/// through [`Outcome`](crate::machine::Outcome).
#[derive(Debug, Error)]
pub enum MachineError {
    /// The machine was closed and no longer accepts events or subscribers
    #[error("Machine is closed")]
    Closed,

    /// The dispatcher task panicked or was cancelled
    #[error("Dispatcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
