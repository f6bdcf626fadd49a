//! Command vocabulary sent to the motion backend.
//!
//! Workflows never talk to the backend directly; their entry actions
//! return these values and the service delivers them in order.

use crate::probe::types::{Axis, Units, WorkCoordinateSystem};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Positioning {
    /// G90
    Absolute,
    /// G91
    Relative,
}

impl Positioning {
    pub fn gcode(self) -> &'static str {
        match self {
            Self::Absolute => "G90",
            Self::Relative => "G91",
        }
    }
}

/// A textual motion command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionCommand {
    /// Rapid linear move along one axis, e.g. `G91 G21 G0 Z1`.
    Rapid {
        positioning: Positioning,
        units: Units,
        axis: Axis,
        value: f64,
    },
    /// Coordinate register write, e.g. `G10 L20 P1 X3 Y-3`.
    SetWorkOffset {
        wcs: WorkCoordinateSystem,
        values: Vec<(Axis, f64)>,
    },
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid {
                positioning,
                units,
                axis,
                value,
            } => write!(
                f,
                "{} {} G0 {}{}",
                positioning.gcode(),
                units.gcode(),
                axis,
                value
            ),
            Self::SetWorkOffset { wcs, values } => {
                write!(f, "G10 L20 P{}", wcs.p_value())?;
                for (axis, value) in values {
                    write!(f, " {axis}{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// A single-axis probe move; the backend owns the probe G-code dialect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeCommand {
    pub axis: Axis,
    pub feed_rate: f64,
    pub distance: f64,
    pub units: Units,
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "probe {}{} F{} ({})",
            self.axis,
            self.distance,
            self.feed_rate,
            self.units.gcode()
        )
    }
}

/// Effect produced by a workflow entry action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Motion(MotionCommand),
    Probe(ProbeCommand),
}

impl Command {
    pub fn relative_rapid(units: Units, axis: Axis, value: f64) -> Self {
        Self::Motion(MotionCommand::Rapid {
            positioning: Positioning::Relative,
            units,
            axis,
            value,
        })
    }

    pub fn absolute_rapid(units: Units, axis: Axis, value: f64) -> Self {
        Self::Motion(MotionCommand::Rapid {
            positioning: Positioning::Absolute,
            units,
            axis,
            value,
        })
    }

    pub fn set_work_offset(wcs: WorkCoordinateSystem, values: Vec<(Axis, f64)>) -> Self {
        Self::Motion(MotionCommand::SetWorkOffset { wcs, values })
    }

    pub fn probe(axis: Axis, feed_rate: f64, distance: f64, units: Units) -> Self {
        Self::Probe(ProbeCommand {
            axis,
            feed_rate,
            distance,
            units,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion(motion) => write!(f, "{motion}"),
            Self::Probe(probe) => write!(f, "{probe}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_rapid_renders_shortest_values() {
        let cmd = Command::relative_rapid(Units::Millimeters, Axis::Z, 1.0);
        assert_eq!(cmd.to_string(), "G91 G21 G0 Z1");

        let cmd = Command::relative_rapid(Units::Inches, Axis::Y, -2.5);
        assert_eq!(cmd.to_string(), "G91 G20 G0 Y-2.5");
    }

    #[test]
    fn absolute_rapid_uses_g90() {
        let cmd = Command::absolute_rapid(Units::Millimeters, Axis::Z, 10.0);
        assert_eq!(cmd.to_string(), "G90 G21 G0 Z10");
    }

    #[test]
    fn work_offset_writes_every_axis() {
        let cmd = Command::set_work_offset(
            WorkCoordinateSystem::G55,
            vec![(Axis::X, 3.0), (Axis::Y, -4.25)],
        );
        assert_eq!(cmd.to_string(), "G10 L20 P2 X3 Y-4.25");
    }

    #[test]
    fn single_axis_work_offset() {
        let cmd = Command::set_work_offset(WorkCoordinateSystem::G54, vec![(Axis::Z, 0.5)]);
        assert_eq!(cmd.to_string(), "G10 L20 P1 Z0.5");
    }
}
