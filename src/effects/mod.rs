//! Runtime side of the engine.
//!
//! This module applies events to a built machine and runs the entry
//! actions of each entered state.
//!
//! # Key Concepts
//!
//! - **Transitions**: one deterministic edge per `(state, event)` pair
//! - **Entry actions**: functions of the shared context that return a
//!   description of the effects to perform, so the engine stays free of
//!   any I/O
//! - **No-match policy**: unmatched events are ignored or raised

mod machine;
mod transition;

pub use machine::{Applied, StateMachine};
pub use transition::{ActionError, EntryAction, NoMatchPolicy, TransitionError};
