//! Build errors for state machine builders.

use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Duplicate transition from state '{from}' on event '{event}'")]
    DuplicateTransition { from: String, event: String },
}
