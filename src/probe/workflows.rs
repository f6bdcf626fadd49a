//! Transition tables and entry actions of the two probing workflows.
//!
//! Entry actions only read and update the [`ProbeContext`] and return the
//! commands to deliver; the service performs the delivery.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::effects::{ActionError, NoMatchPolicy, StateMachine};
use crate::probe::context::ProbeContext;
use crate::probe::gcode::Command;
use crate::probe::types::{Axis, Position};
use crate::{event_enum, state_enum};
use serde::{Deserialize, Serialize};
use std::fmt;

state_enum! {
    /// States of the single-axis depth (Z) probe.
    pub enum DepthState {
        Waiting,
        FastApproach,
        SmallRetract,
        SlowApproach,
        Finalize,
    }
    final: [Finalize]
}

state_enum! {
    /// States of the outside-corner probe: a Y leg, then an X leg.
    pub enum CornerState {
        Waiting,
        Setup,
        ProbeY1,
        RetractY1,
        ProbeY2,
        StoreY,
        ProbeX1,
        RetractX1,
        ProbeX2,
        StoreXFinalize,
    }
    final: [StoreXFinalize]
}

event_enum! {
    /// Domain triggers, decoupled from raw backend status codes.
    pub enum ProbeEvent {
        Start,
        Probed,
        Idle,
    }
}

pub type ProbeMachine<S> = StateMachine<S, ProbeEvent, ProbeContext, Command>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    Depth,
    OutsideCorner,
}

impl Workflow {
    /// Axes whose spacing the workflow travels along while probing.
    pub fn probed_axes(self) -> &'static [Axis] {
        match self {
            Self::Depth => &[Axis::Z],
            Self::OutsideCorner => &[Axis::X, Axis::Y],
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth => write!(f, "depth"),
            Self::OutsideCorner => write!(f, "outside corner"),
        }
    }
}

/// Back-off after a fast contact: one unit, away from the surface.
pub fn retract_distance(spacing: f64) -> f64 {
    if spacing < 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Side of the edge the probe ends up on, relative to the approach.
pub fn approach_sign(spacing: f64) -> f64 {
    if spacing > 0.0 {
        -1.0
    } else {
        1.0
    }
}

type ActionResult = Result<Vec<Command>, ActionError>;

fn fast_probe(axis: Axis) -> impl Fn(&mut ProbeContext) -> ActionResult {
    move |ctx| {
        let s = ctx.settings();
        Ok(vec![Command::probe(axis, s.feed_rate, s.spacing(axis), s.units)])
    }
}

fn slow_probe(axis: Axis) -> impl Fn(&mut ProbeContext) -> ActionResult {
    move |ctx| {
        let s = ctx.settings();
        Ok(vec![Command::probe(
            axis,
            s.feed_rate_slow,
            s.spacing(axis),
            s.units,
        )])
    }
}

fn retract(axis: Axis) -> impl Fn(&mut ProbeContext) -> ActionResult {
    move |ctx| {
        let s = ctx.settings();
        Ok(vec![Command::relative_rapid(
            s.units,
            axis,
            retract_distance(s.spacing(axis)),
        )])
    }
}

fn contact(ctx: &ProbeContext, leg: Axis) -> Result<Position, ActionError> {
    ctx.last_contact()
        .ok_or_else(|| ActionError::new(format!("no contact position for the {leg} leg")))
}

/// Offset of the probed edge from the start position, corrected for the
/// tool radius and the user's edge offset.
fn edge_offset(ctx: &ProbeContext, axis: Axis, contact: Position) -> f64 {
    let s = ctx.settings();
    let radius = s.probe_diameter / 2.0;
    ctx.start_position().axis(axis) - contact.axis(axis)
        + approach_sign(s.spacing(axis)) * (radius + s.edge_offset(axis))
}

fn finalize_depth(ctx: &mut ProbeContext) -> ActionResult {
    let s = ctx.settings();
    let z_offset = s.z_offset;
    let commands = vec![
        Command::set_work_offset(s.wcs, vec![(Axis::Z, z_offset)]),
        Command::absolute_rapid(s.units, Axis::Z, s.retract_height),
    ];
    ctx.z_wcs_offset = Some(z_offset);
    Ok(commands)
}

fn store_y(ctx: &mut ProbeContext) -> ActionResult {
    let contact = contact(ctx, Axis::Y)?;
    ctx.probe_position1 = Some(contact);

    let s = ctx.settings();
    let travel_back = ctx.start_position().y - contact.y;
    Ok(vec![
        Command::relative_rapid(s.units, Axis::Y, travel_back),
        Command::relative_rapid(s.units, Axis::X, -s.x_spacing),
        Command::relative_rapid(s.units, Axis::Y, s.y_spacing),
    ])
}

fn finalize_corner(ctx: &mut ProbeContext) -> ActionResult {
    let first = ctx
        .probe_position1
        .ok_or_else(|| ActionError::new("Y leg contact was never recorded"))?;
    let second = contact(ctx, Axis::X)?;
    ctx.probe_position2 = Some(second);

    let x_offset = edge_offset(ctx, Axis::X, second);
    let y_offset = edge_offset(ctx, Axis::Y, first);
    ctx.x_wcs_offset = Some(x_offset);
    ctx.y_wcs_offset = Some(y_offset);
    ctx.z_wcs_offset = Some(0.0);

    let s = ctx.settings();
    let travel_back = ctx.start_position().x - second.x;
    Ok(vec![
        Command::relative_rapid(s.units, Axis::X, travel_back),
        Command::relative_rapid(s.units, Axis::Y, -s.y_spacing),
        Command::set_work_offset(s.wcs, vec![(Axis::X, x_offset), (Axis::Y, y_offset)]),
    ])
}

/// Fast approach, retract, slow approach, then write the Z register.
pub fn depth_probe(policy: NoMatchPolicy) -> Result<ProbeMachine<DepthState>, BuildError> {
    use DepthState::*;
    use ProbeEvent::*;

    StateMachineBuilder::new(Waiting)
        .transitions([
            (Waiting, Start, FastApproach),
            (FastApproach, Probed, SmallRetract),
            (SmallRetract, Idle, SlowApproach),
            (SlowApproach, Probed, Finalize),
        ])?
        .on_enter(FastApproach, fast_probe(Axis::Z))
        .on_enter(SmallRetract, retract(Axis::Z))
        .on_enter(SlowApproach, slow_probe(Axis::Z))
        .on_enter(Finalize, finalize_depth)
        .no_match_policy(policy)
        .build()
}

/// Probe the Y face, reposition, probe the X face, write X and Y.
pub fn outside_corner_probe(
    policy: NoMatchPolicy,
) -> Result<ProbeMachine<CornerState>, BuildError> {
    use CornerState::*;
    use ProbeEvent::*;

    StateMachineBuilder::new(Waiting)
        .transitions([
            (Waiting, Start, Setup),
            (Setup, Idle, ProbeY1),
            (ProbeY1, Probed, RetractY1),
            (RetractY1, Idle, ProbeY2),
            (ProbeY2, Probed, StoreY),
            (StoreY, Idle, ProbeX1),
            (ProbeX1, Probed, RetractX1),
            (RetractX1, Idle, ProbeX2),
            (ProbeX2, Probed, StoreXFinalize),
        ])?
        .on_enter(Setup, |ctx: &mut ProbeContext| {
            let s = ctx.settings();
            Ok(vec![Command::relative_rapid(s.units, Axis::X, s.x_spacing)])
        })
        .on_enter(ProbeY1, fast_probe(Axis::Y))
        .on_enter(RetractY1, retract(Axis::Y))
        .on_enter(ProbeY2, slow_probe(Axis::Y))
        .on_enter(StoreY, store_y)
        .on_enter(ProbeX1, fast_probe(Axis::X))
        .on_enter(RetractX1, retract(Axis::X))
        .on_enter(ProbeX2, slow_probe(Axis::X))
        .on_enter(StoreXFinalize, finalize_corner)
        .no_match_policy(policy)
        .build()
}
