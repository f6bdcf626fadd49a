//! Builder API for state machine construction.
//!
//! This module provides a fluent builder and macros for declaring a
//! machine as a transition table plus per-state entry actions.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
