//! Transition-level types: entry actions, no-match policy and errors.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Side-effect description produced by an entry action.
///
/// Actions are functions of the shared context. They may update the
/// context, and they return the effects the owner of the machine should
/// perform; the engine itself never performs them.
pub type EntryAction<C, O> = Arc<dyn Fn(&mut C) -> Result<Vec<O>, ActionError> + Send + Sync>;

/// What `apply` does when no edge exists for `(current state, event)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Return `Applied::Ignored` and leave the machine untouched
    #[default]
    Ignore,

    /// Return `TransitionError::Unmatched`
    Raise,
}

/// Failure reported by an entry action.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{reason}")]
pub struct ActionError {
    reason: String,
}

impl ActionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors that can occur while applying an event
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("No transition from state '{state}' on event '{event}'")]
    Unmatched { state: String, event: String },

    /// The machine is already in `state`; entry actions after the failing
    /// one were not run.
    #[error("Entry action for state '{state}' failed: {source}")]
    ActionFailed { state: String, source: ActionError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_ignores() {
        assert_eq!(NoMatchPolicy::default(), NoMatchPolicy::Ignore);
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let policy: NoMatchPolicy = serde_json::from_str("\"raise\"").unwrap();
        assert_eq!(policy, NoMatchPolicy::Raise);
    }

    #[test]
    fn action_failure_message_names_state() {
        let err = TransitionError::ActionFailed {
            state: "StoreY".to_string(),
            source: ActionError::new("no contact position"),
        };
        assert_eq!(
            err.to_string(),
            "Entry action for state 'StoreY' failed: no contact position"
        );
    }
}
