//! Records describing applied transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a machine instance.
///
/// Used to tag log spans and transition records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(Uuid);

impl MachineId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Record of a single applied transition.
///
/// Records are immutable values. One is produced each time a transition
/// completes its hook pipeline; the runtime does not keep them.
///
/// # Example
///
/// ```rust
/// use cadence::core::{MachineId, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     machine: MachineId::new(),
///     sequence: 1,
///     from: "Idle",
///     to: "Running",
///     event: "Start".to_string(),
///     completed_at: Utc::now(),
/// };
///
/// assert_eq!(record.to, "Running");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// Machine that applied the transition
    pub machine: MachineId,
    /// 1-based position among the transitions applied by this machine
    pub sequence: u64,
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the event that triggered the transition
    pub event: String,
    /// When the last hook of the transition finished
    pub completed_at: DateTime<Utc>,
}
