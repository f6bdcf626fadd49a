//! Cycle parameters and their validation.

use crate::probe::types::{Axis, Units, WorkCoordinateSystem};
use crate::probe::workflows::Workflow;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use thiserror::Error;

/// Immutable parameters of one probe cycle.
///
/// Every field has a default so partial documents deserialize:
///
/// ```
/// use touchprobe::probe::{ProbeSettings, WorkCoordinateSystem};
///
/// let settings: ProbeSettings =
///     serde_json::from_str(r#"{ "z_spacing": -5.0, "wcs": "G55" }"#).unwrap();
/// assert_eq!(settings.z_spacing, -5.0);
/// assert_eq!(settings.wcs, WorkCoordinateSystem::G55);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub probe_diameter: f64,
    /// Distance to travel along X before contact is expected; the sign
    /// gives the approach direction.
    pub x_spacing: f64,
    pub y_spacing: f64,
    pub z_spacing: f64,
    /// Extra distance between the probed edge and the desired zero.
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub feed_rate: f64,
    pub feed_rate_slow: f64,
    /// Absolute Z the depth probe returns to.
    pub retract_height: f64,
    pub units: Units,
    pub wcs: WorkCoordinateSystem,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            probe_diameter: 0.0,
            x_spacing: 10.0,
            y_spacing: 10.0,
            z_spacing: -10.0,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            feed_rate: 250.0,
            feed_rate_slow: 25.0,
            retract_height: 15.0,
            units: Units::Millimeters,
            wcs: WorkCoordinateSystem::G54,
        }
    }
}

/// A single rejected parameter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsViolation {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("probe_diameter must not be negative, got {0}")]
    NegativeDiameter(f64),

    #[error("{axis} spacing must be non-zero for a {workflow} probe")]
    ZeroSpacing { axis: Axis, workflow: Workflow },
}

/// Every violation found in a settings value.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid probe settings: {}", join(.violations))]
pub struct SettingsError {
    pub violations: Vec<SettingsViolation>,
}

fn join(violations: &[SettingsViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type Check = Validation<(), Vec<SettingsViolation>>;

fn require(ok: bool, violation: impl FnOnce() -> SettingsViolation) -> Check {
    if ok {
        Validation::Success(())
    } else {
        Validation::Failure(vec![violation()])
    }
}

fn positive(field: &'static str, value: f64) -> Check {
    require(value.is_finite() && value > 0.0, || {
        SettingsViolation::NotPositive { field, value }
    })
}

fn finite(field: &'static str, value: f64) -> Check {
    require(value.is_finite(), || SettingsViolation::NotFinite { field, value })
}

impl ProbeSettings {
    pub fn spacing(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_spacing,
            Axis::Y => self.y_spacing,
            Axis::Z => self.z_spacing,
        }
    }

    pub fn edge_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_offset,
            Axis::Y => self.y_offset,
            Axis::Z => self.z_offset,
        }
    }

    /// Check the parameters a workflow depends on, reporting every
    /// violation rather than the first one.
    pub fn validate(&self, workflow: Workflow) -> Result<(), SettingsError> {
        let mut checks = vec![
            positive("feed_rate", self.feed_rate),
            positive("feed_rate_slow", self.feed_rate_slow),
            finite("probe_diameter", self.probe_diameter),
            require(self.probe_diameter.is_nan() || self.probe_diameter >= 0.0, || {
                SettingsViolation::NegativeDiameter(self.probe_diameter)
            }),
            finite("x_offset", self.x_offset),
            finite("y_offset", self.y_offset),
            finite("z_offset", self.z_offset),
            finite("retract_height", self.retract_height),
        ];

        for &axis in workflow.probed_axes() {
            let spacing = self.spacing(axis);
            checks.push(require(spacing.is_finite() && spacing != 0.0, || {
                SettingsViolation::ZeroSpacing { axis, workflow }
            }));
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => Err(SettingsError { violations }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_for_both_workflows() {
        let settings = ProbeSettings::default();
        assert!(settings.validate(Workflow::Depth).is_ok());
        assert!(settings.validate(Workflow::OutsideCorner).is_ok());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let settings = ProbeSettings {
            feed_rate: 0.0,
            feed_rate_slow: -1.0,
            probe_diameter: -2.0,
            x_spacing: 0.0,
            y_spacing: 0.0,
            ..ProbeSettings::default()
        };

        let err = settings.validate(Workflow::OutsideCorner).unwrap_err();

        assert_eq!(err.violations.len(), 5);
        assert!(err
            .violations
            .contains(&SettingsViolation::NegativeDiameter(-2.0)));
        assert!(err.violations.contains(&SettingsViolation::ZeroSpacing {
            axis: Axis::Y,
            workflow: Workflow::OutsideCorner,
        }));
    }

    #[test]
    fn depth_probe_only_checks_z_spacing() {
        let settings = ProbeSettings {
            x_spacing: 0.0,
            y_spacing: 0.0,
            ..ProbeSettings::default()
        };
        assert!(settings.validate(Workflow::Depth).is_ok());

        let settings = ProbeSettings {
            z_spacing: 0.0,
            ..ProbeSettings::default()
        };
        let err = settings.validate(Workflow::Depth).unwrap_err();
        assert_eq!(
            err.violations,
            vec![SettingsViolation::ZeroSpacing {
                axis: Axis::Z,
                workflow: Workflow::Depth,
            }]
        );
    }

    #[test]
    fn nan_values_are_rejected() {
        let settings = ProbeSettings {
            retract_height: f64::NAN,
            ..ProbeSettings::default()
        };
        let err = settings.validate(Workflow::Depth).unwrap_err();
        assert!(err.to_string().contains("retract_height must be finite"));
    }

    #[test]
    fn settings_roundtrip_through_json() {
        let settings = ProbeSettings {
            probe_diameter: 6.0,
            units: Units::Inches,
            ..ProbeSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: ProbeSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
