//! Cadence: an async finite state machine runtime
//!
//! Cadence sequences state changes from a fixed transition table, runs
//! lifecycle hooks around every transition and publishes each new state to
//! subscribers. Events are resolved strictly one at a time, in the order
//! they were submitted.
//!
//! # Core Concepts
//!
//! - **State / Event**: values tagged with a closed, enumerated kind
//! - **Transition table**: immutable `(state kind, event kind) -> transition` rules
//! - **Hooks**: async functions that may replace the shared context
//! - **Machine**: a dedicated task that owns state, context and the event queue
//!
//! # Hook order
//!
//! For every applied transition:
//!
//! 1. transition exit hook (still in the old state)
//! 2. old state's exit hook
//! 3. transition action
//! 4. state switch
//! 5. transition entry hook
//! 6. new state's entry hook
//! 7. notification to subscribers
//!
//! # Example
//!
//! ```rust
//! use cadence::hooks::sync_hook;
//! use cadence::table::{StateHooks, TransitionBuilder, TransitionTable};
//! use cadence::{event_enum, state_enum, Machine};
//!
//! state_enum! {
//!     enum Flow { Idle, StepOne, StepTwo, Completed }
//!     final: [Completed]
//! }
//!
//! event_enum! {
//!     enum Signal { NextStep }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let table: TransitionTable<Flow, Signal, u32> = TransitionTable::builder()
//!     .transition(TransitionBuilder::new().from(Flow::Idle).on(Signal::NextStep).to(Flow::StepOne))
//!     .transition(TransitionBuilder::new().from(Flow::StepOne).on(Signal::NextStep).to(Flow::StepTwo))
//!     .transition(TransitionBuilder::new().from(Flow::StepTwo).on(Signal::NextStep).to(Flow::Completed))
//!     .state(Flow::Completed, StateHooks::new().on_entry(sync_hook(|runs: u32| Some(runs + 1))))
//!     .build()
//!     .unwrap();
//!
//! let machine = Machine::new(0, Flow::Idle, table);
//! for _ in 0..3 {
//!     machine.enqueue(Signal::NextStep).unwrap();
//! }
//!
//! assert_eq!(machine.close().await.unwrap(), 1);
//! # }
//! ```

pub mod core;
pub mod hooks;
mod macros;
pub mod machine;
pub mod table;

// Re-export commonly used types
pub use crate::core::{Event, MachineId, State, TransitionRecord};
pub use hooks::{hook, sync_hook, Hook, HookError, HookStage};
pub use machine::{Machine, MachineConfig, MachineError, MachineHandle, Outcome, Subscription};
pub use table::{StateHooks, TransitionBuilder, TransitionTable};
