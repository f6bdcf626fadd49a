//! Errors surfaced by the probe service.

use crate::builder::BuildError;
use crate::effects::TransitionError;
use crate::probe::backend::CommandError;
use crate::probe::settings::SettingsError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProbeError {
    /// The backend was not ready when a cycle was requested.
    #[error("Can only begin probing while the controller is idle")]
    NotReady,

    /// Only raised when `ServiceConfig::exclusive_cycles` is set.
    #[error("A probe cycle is already active")]
    CycleActive,

    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),

    #[error("Failed to deliver '{command}': {source}")]
    CommandDelivery {
        command: String,
        source: CommandError,
    },

    #[error("Probe cycle aborted: {0}")]
    Transition(#[from] TransitionError),

    #[error("Invalid workflow definition: {0}")]
    Build(#[from] BuildError),
}
