//! Contract between the probe service and the motion backend.
//!
//! The backend owns transport, queueing and firmware parsing. The service
//! only asks whether the controller is ready, delivers commands, and is
//! fed status and contact events in order by whoever subscribes to the
//! backend.

use crate::probe::types::{Axis, Position, Units};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Controller connection status carried by status events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlState {
    /// Connected and idle; ready for the next command.
    Idle,
    Disconnected,
    /// Running, alarm, hold, ...; not interpreted by the probe service.
    Other,
}

/// Events delivered by the backend's subscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BackendEvent {
    Status(ControlState),
    /// The probe touched something at this machine position.
    ProbeContact(Position),
    /// Anything else the backend publishes (file streaming, settings...).
    Other,
}

impl BackendEvent {
    pub fn contact_position(&self) -> Option<Position> {
        match self {
            Self::ProbeContact(position) => Some(*position),
            _ => None,
        }
    }
}

/// A command could not be delivered to the controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("Controller is not connected")]
    NotConnected,

    #[error("Controller rejected '{command}': {reason}")]
    Rejected { command: String, reason: String },

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Motion backend consumed by [`ProbeService`](crate::probe::ProbeService).
///
/// Both command methods are synchronous; returning `Err` aborts the
/// active probe cycle.
pub trait Backend {
    /// Whether the controller is connected and idle.
    fn is_ready(&self) -> bool;

    fn send_motion_command(&mut self, command: &str) -> Result<(), CommandError>;

    fn probe_axis(
        &mut self,
        axis: Axis,
        feed_rate: f64,
        distance: f64,
        units: Units,
    ) -> Result<(), CommandError>;
}
