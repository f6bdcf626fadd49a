//! Per-cycle context shared by a workflow's entry actions.

use crate::probe::backend::BackendEvent;
use crate::probe::settings::ProbeSettings;
use crate::probe::types::Position;

/// Parameters and results of one probe cycle.
///
/// Created by the caller, then moved into the service for the lifetime
/// of the cycle. Results are written by entry actions only.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeContext {
    settings: ProbeSettings,
    start_position: Position,

    pub(crate) probe_position1: Option<Position>,
    pub(crate) probe_position2: Option<Position>,
    pub(crate) x_wcs_offset: Option<f64>,
    pub(crate) y_wcs_offset: Option<f64>,
    pub(crate) z_wcs_offset: Option<f64>,
    pub(crate) last_event: Option<BackendEvent>,
}

impl ProbeContext {
    pub fn new(settings: ProbeSettings, start_position: Position) -> Self {
        Self {
            settings,
            start_position,
            probe_position1: None,
            probe_position2: None,
            x_wcs_offset: None,
            y_wcs_offset: None,
            z_wcs_offset: None,
            last_event: None,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn start_position(&self) -> Position {
        self.start_position
    }

    /// Contact point of the first precise leg (Y leg of the corner probe).
    pub fn probe_position1(&self) -> Option<Position> {
        self.probe_position1
    }

    pub fn probe_position2(&self) -> Option<Position> {
        self.probe_position2
    }

    pub fn x_wcs_offset(&self) -> Option<f64> {
        self.x_wcs_offset
    }

    pub fn y_wcs_offset(&self) -> Option<f64> {
        self.y_wcs_offset
    }

    pub fn z_wcs_offset(&self) -> Option<f64> {
        self.z_wcs_offset
    }

    /// Most recent backend event delivered while the cycle was active.
    pub fn last_event(&self) -> Option<&BackendEvent> {
        self.last_event.as_ref()
    }

    pub(crate) fn last_contact(&self) -> Option<Position> {
        self.last_event
            .as_ref()
            .and_then(BackendEvent::contact_position)
    }
}
