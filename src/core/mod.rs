//! Core state machine types.
//!
//! This module contains the pure vocabulary of the engine:
//! - State definitions via the `State` trait
//! - Event definitions via the `Event` trait
//! - Immutable history tracking
//!
//! Nothing in this module performs I/O.

mod event;
mod history;
mod state;

pub use event::Event;
pub use history::{StateHistory, StateTransition};
pub use state::State;
