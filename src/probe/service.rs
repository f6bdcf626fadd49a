//! The probe workflow controller.
//!
//! `ProbeService` owns at most one active cycle. Callers start a workflow;
//! afterwards the cycle only advances when the backend's event
//! subscription hands an event to [`ProbeService::handle_event`].

use crate::core::State;
use crate::effects::{Applied, NoMatchPolicy, TransitionError};
use crate::probe::backend::{Backend, BackendEvent, ControlState};
use crate::probe::context::ProbeContext;
use crate::probe::error::ProbeError;
use crate::probe::gcode::Command;
use crate::probe::report::CycleReport;
use crate::probe::workflows::{
    depth_probe, outside_corner_probe, CornerState, DepthState, ProbeEvent, ProbeMachine,
    Workflow,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Service-wide options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub no_match_policy: NoMatchPolicy,
    /// Reject a start request while another cycle is active. Off by
    /// default: a new start replaces the active cycle.
    pub exclusive_cycles: bool,
}

struct ActiveCycle<S: State> {
    id: Uuid,
    workflow: Workflow,
    started_at: DateTime<Utc>,
    machine: ProbeMachine<S>,
    context: ProbeContext,
}

enum Progress {
    Running,
    Finished(CycleReport),
    Failed(ProbeError),
}

impl<S: State> ActiveCycle<S> {
    fn new(workflow: Workflow, machine: ProbeMachine<S>, context: ProbeContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow,
            started_at: Utc::now(),
            machine,
            context,
        }
    }

    fn step<B: Backend>(&mut self, event: ProbeEvent, backend: &mut B) -> Progress {
        let commands = match self.machine.apply(event, &mut self.context) {
            Ok(Applied::Transitioned { effects, .. }) => effects,
            Ok(Applied::Ignored) => return Progress::Running,
            Err(TransitionError::Unmatched { state, event }) => {
                warn!(cycle_id = %self.id, %state, %event, "unexpected event for probe cycle");
                return Progress::Running;
            }
            Err(err) => return Progress::Failed(err.into()),
        };

        for command in &commands {
            if let Err(err) = deliver(backend, command) {
                return Progress::Failed(err);
            }
        }

        if self.machine.is_final() {
            Progress::Finished(self.report())
        } else {
            Progress::Running
        }
    }

    fn report(&self) -> CycleReport {
        let ctx = &self.context;
        CycleReport {
            id: self.id,
            workflow: self.workflow,
            started_at: self.started_at,
            finished_at: Utc::now(),
            path: self
                .machine
                .history()
                .get_path()
                .into_iter()
                .map(|s| s.name().to_string())
                .collect(),
            start_position: ctx.start_position(),
            probe_position1: ctx.probe_position1(),
            probe_position2: ctx.probe_position2(),
            x_offset: ctx.x_wcs_offset(),
            y_offset: ctx.y_wcs_offset(),
            z_offset: ctx.z_wcs_offset(),
        }
    }
}

fn deliver<B: Backend>(backend: &mut B, command: &Command) -> Result<(), ProbeError> {
    debug!(%command, "sending command");
    let result = match command {
        Command::Motion(motion) => backend.send_motion_command(&motion.to_string()),
        Command::Probe(probe) => {
            backend.probe_axis(probe.axis, probe.feed_rate, probe.distance, probe.units)
        }
    };
    result.map_err(|source| ProbeError::CommandDelivery {
        command: command.to_string(),
        source,
    })
}

/// Either no cycle, or exactly one cycle of a known workflow.
enum Cycle {
    Idle,
    Depth(ActiveCycle<DepthState>),
    OutsideCorner(ActiveCycle<CornerState>),
}

impl Cycle {
    fn id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Depth(c) => Some(c.id),
            Self::OutsideCorner(c) => Some(c.id),
        }
    }

    fn context(&self) -> Option<&ProbeContext> {
        match self {
            Self::Idle => None,
            Self::Depth(c) => Some(&c.context),
            Self::OutsideCorner(c) => Some(&c.context),
        }
    }

    fn context_mut(&mut self) -> Option<&mut ProbeContext> {
        match self {
            Self::Idle => None,
            Self::Depth(c) => Some(&mut c.context),
            Self::OutsideCorner(c) => Some(&mut c.context),
        }
    }

    fn state_name(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Depth(c) => Some(c.machine.current_state().name()),
            Self::OutsideCorner(c) => Some(c.machine.current_state().name()),
        }
    }

    fn workflow(&self) -> Option<Workflow> {
        match self {
            Self::Idle => None,
            Self::Depth(c) => Some(c.workflow),
            Self::OutsideCorner(c) => Some(c.workflow),
        }
    }
}

/// Drives probe cycles against a motion backend.
pub struct ProbeService<B: Backend> {
    backend: B,
    config: ServiceConfig,
    cycle: Cycle,
    last_report: Option<CycleReport>,
    last_fault: Option<ProbeError>,
}

impl<B: Backend> ProbeService<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ServiceConfig::default())
    }

    pub fn with_config(backend: B, config: ServiceConfig) -> Self {
        Self {
            backend,
            config,
            cycle: Cycle::Idle,
            last_report: None,
            last_fault: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn is_cycle_active(&self) -> bool {
        !matches!(self.cycle, Cycle::Idle)
    }

    pub fn active_workflow(&self) -> Option<Workflow> {
        self.cycle.workflow()
    }

    /// Name of the active cycle's current state.
    pub fn current_state(&self) -> Option<&str> {
        self.cycle.state_name()
    }

    pub fn active_context(&self) -> Option<&ProbeContext> {
        self.cycle.context()
    }

    /// Summary of the most recently completed cycle.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Most recent failure that aborted a cycle.
    pub fn last_fault(&self) -> Option<&ProbeError> {
        self.last_fault.as_ref()
    }

    pub fn take_fault(&mut self) -> Option<ProbeError> {
        self.last_fault.take()
    }

    fn validate_state(&self) -> Result<(), ProbeError> {
        if !self.backend.is_ready() {
            return Err(ProbeError::NotReady);
        }
        if self.config.exclusive_cycles && self.is_cycle_active() {
            return Err(ProbeError::CycleActive);
        }
        Ok(())
    }

    fn replace_cycle(&mut self, next: Cycle) {
        if let Some(previous) = self.cycle.id() {
            warn!(cycle_id = %previous, "replacing active probe cycle");
        }
        self.cycle = next;
    }

    /// Start a depth probe along Z.
    ///
    /// Fails with [`ProbeError::NotReady`] when the backend is not idle.
    /// If the first command cannot be delivered the cycle is discarded
    /// and the delivery error returned.
    pub fn start_depth_probe(&mut self, context: ProbeContext) -> Result<(), ProbeError> {
        self.validate_state()?;
        context.settings().validate(Workflow::Depth)?;

        let machine = depth_probe(self.config.no_match_policy)?;
        let cycle = ActiveCycle::new(Workflow::Depth, machine, context);
        info!(cycle_id = %cycle.id, workflow = %cycle.workflow, "starting probe cycle");
        self.replace_cycle(Cycle::Depth(cycle));

        self.dispatch(ProbeEvent::Start)
    }

    /// Start an outside-corner probe: Y face first, then X face.
    pub fn start_outside_corner_probe(&mut self, context: ProbeContext) -> Result<(), ProbeError> {
        self.validate_state()?;
        context.settings().validate(Workflow::OutsideCorner)?;

        let machine = outside_corner_probe(self.config.no_match_policy)?;
        let cycle = ActiveCycle::new(Workflow::OutsideCorner, machine, context);
        info!(cycle_id = %cycle.id, workflow = %cycle.workflow, "starting probe cycle");
        self.replace_cycle(Cycle::OutsideCorner(cycle));

        self.dispatch(ProbeEvent::Start)
    }

    /// Reactive entry point for the backend's event subscription.
    ///
    /// Never fails: delivery and action failures abort the cycle, are
    /// logged, and are kept in [`last_fault`](Self::last_fault).
    pub fn handle_event(&mut self, event: BackendEvent) {
        match self.cycle.context_mut() {
            Some(context) => context.last_event = Some(event.clone()),
            None => return,
        }

        let trigger = match event {
            BackendEvent::Status(ControlState::Idle) => ProbeEvent::Idle,
            BackendEvent::ProbeContact(_) => ProbeEvent::Probed,
            BackendEvent::Status(ControlState::Disconnected) => {
                if let Some(id) = self.cycle.id() {
                    warn!(cycle_id = %id, "controller disconnected, discarding probe cycle");
                }
                self.cycle = Cycle::Idle;
                return;
            }
            BackendEvent::Status(ControlState::Other) | BackendEvent::Other => return,
        };

        // Already logged and recorded as the last fault.
        let _ = self.dispatch(trigger);
    }

    fn dispatch(&mut self, event: ProbeEvent) -> Result<(), ProbeError> {
        let progress = match &mut self.cycle {
            Cycle::Idle => return Ok(()),
            Cycle::Depth(cycle) => cycle.step(event, &mut self.backend),
            Cycle::OutsideCorner(cycle) => cycle.step(event, &mut self.backend),
        };

        match progress {
            Progress::Running => Ok(()),
            Progress::Finished(report) => {
                info!(
                    cycle_id = %report.id,
                    workflow = %report.workflow,
                    x_offset = ?report.x_offset,
                    y_offset = ?report.y_offset,
                    z_offset = ?report.z_offset,
                    "probe cycle complete"
                );
                self.cycle = Cycle::Idle;
                self.last_report = Some(report);
                Ok(())
            }
            Progress::Failed(err) => {
                if let Some(id) = self.cycle.id() {
                    error!(cycle_id = %id, error = %err, "probe cycle aborted");
                }
                self.cycle = Cycle::Idle;
                self.last_fault = Some(err.clone());
                Err(err)
            }
        }
    }
}
