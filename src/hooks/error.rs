//! Hook error types.

use std::time::Duration;
use thiserror::Error;

/// Errors a hook can produce while a transition is in flight
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HookError {
    /// The hook reported a failure
    #[error("Hook failed: {message}")]
    Failed { message: String },

    /// The hook did not finish within the configured timeout
    #[error("Hook timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// The hook panicked
    #[error("Hook panicked")]
    Panicked,
}

impl HookError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
