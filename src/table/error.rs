//! Build errors for transitions and transition tables.

use thiserror::Error;

/// Errors that can occur when building transitions and tables.
///
/// Kinds are rendered with their `Debug` form so the error stays free of
/// type parameters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(kind)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(kind)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingTarget,

    #[error("Duplicate transition for state {state} on event {event}")]
    DuplicateTransition { state: String, event: String },

    #[error("Hooks registered twice for state {state}")]
    DuplicateStateHooks { state: String },
}

/// Every problem found while validating a transition table.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid transition table: {}", render(.errors))]
pub struct TableError {
    pub errors: Vec<BuildError>,
}

fn render(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
