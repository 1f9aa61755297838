//! Core state machine types.
//!
//! This module contains the vocabulary shared by the rest of the crate:
//! - State and event definitions via the `State` and `Event` traits
//! - Machine identifiers and transition records
//!
//! Nothing in here performs I/O or touches the runtime.

mod record;
mod state;

pub use record::{MachineId, TransitionRecord};
pub use state::{Event, Kind, State};
