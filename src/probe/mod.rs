//! Touch-probing workflows for a motion controller.
//!
//! - [`workflows`]: the depth and outside-corner transition tables
//! - [`ProbeService`]: owns the active cycle and reacts to backend events
//! - [`Backend`]: the narrow contract consumed from the motion backend
//!
//! # Example
//!
//! ```
//! use touchprobe::probe::{
//!     Axis, Backend, BackendEvent, CommandError, ControlState, Position, ProbeContext,
//!     ProbeService, ProbeSettings, Units,
//! };
//!
//! #[derive(Default)]
//! struct Log(Vec<String>);
//!
//! impl Backend for Log {
//!     fn is_ready(&self) -> bool {
//!         true
//!     }
//!
//!     fn send_motion_command(&mut self, command: &str) -> Result<(), CommandError> {
//!         self.0.push(command.to_string());
//!         Ok(())
//!     }
//!
//!     fn probe_axis(&mut self, axis: Axis, _: f64, distance: f64, _: Units) -> Result<(), CommandError> {
//!         self.0.push(format!("probe {axis}{distance}"));
//!         Ok(())
//!     }
//! }
//!
//! let mut service = ProbeService::new(Log::default());
//! let settings = ProbeSettings { z_spacing: -5.0, retract_height: 10.0, ..Default::default() };
//! service.start_depth_probe(ProbeContext::new(settings, Position::default()))?;
//!
//! let contact = BackendEvent::ProbeContact(Position::new(0.0, 0.0, -3.2));
//! service.handle_event(contact.clone());
//! service.handle_event(BackendEvent::Status(ControlState::Idle));
//! service.handle_event(contact);
//!
//! assert!(!service.is_cycle_active());
//! assert_eq!(
//!     service.backend().0,
//!     ["probe Z-5", "G91 G21 G0 Z1", "probe Z-5", "G10 L20 P1 Z0", "G90 G21 G0 Z10"]
//! );
//! # Ok::<(), touchprobe::probe::ProbeError>(())
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod gcode;
pub mod report;
pub mod service;
pub mod settings;
pub mod types;
pub mod workflows;

pub use backend::{Backend, BackendEvent, CommandError, ControlState};
pub use context::ProbeContext;
pub use error::ProbeError;
pub use gcode::{Command, MotionCommand, Positioning, ProbeCommand};
pub use report::CycleReport;
pub use service::{ProbeService, ServiceConfig};
pub use settings::{ProbeSettings, SettingsError, SettingsViolation};
pub use types::{Axis, Position, Units, WorkCoordinateSystem};
pub use workflows::{CornerState, DepthState, ProbeEvent, Workflow};
