//! Touchprobe: touch-probing workflows on a small deterministic state machine
//!
//! The crate has two layers. The engine (`core`, `builder`, `effects`) is
//! a generic finite-state machine over a state type, an event type and a
//! shared context; it knows nothing about motion. The `probe` layer builds
//! the depth and outside-corner probing workflows on top of it and drives
//! them from asynchronous controller events.
//!
//! # Core Concepts
//!
//! - **State** / **Event**: plain enums keyed into a transition table
//! - **Entry actions**: functions of the context returning the effects to
//!   perform when a state is entered
//! - **History**: immutable record of the transitions taken
//!
//! # Example
//!
//! ```rust
//! use touchprobe::builder::StateMachineBuilder;
//! use touchprobe::effects::Applied;
//! use touchprobe::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Leg {
//!         Waiting,
//!         Approach,
//!         Done,
//!     }
//!     final: [Done]
//! }
//!
//! event_enum! {
//!     enum Signal {
//!         Start,
//!         Touched,
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::<Leg, Signal, (), &str>::new(Leg::Waiting)
//!     .add_transition(Leg::Waiting, Signal::Start, Leg::Approach)?
//!     .add_transition(Leg::Approach, Signal::Touched, Leg::Done)?
//!     .on_enter(Leg::Approach, |_| Ok(vec!["move"]))
//!     .build()?;
//!
//! let applied = machine.apply(Signal::Start, &mut ()).unwrap();
//! assert_eq!(
//!     applied,
//!     Applied::Transitioned { from: Leg::Waiting, to: Leg::Approach, effects: vec!["move"] }
//! );
//! assert_eq!(machine.apply(Signal::Start, &mut ()).unwrap(), Applied::Ignored);
//! # Ok::<(), touchprobe::builder::BuildError>(())
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod probe;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder};
pub use crate::core::{Event, State, StateHistory, StateTransition};
pub use crate::effects::{Applied, NoMatchPolicy, StateMachine, TransitionError};
pub use crate::probe::{ProbeError, ProbeService};
