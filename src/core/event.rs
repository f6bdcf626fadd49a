//! Trait for the external triggers that drive a state machine.

use std::fmt::Debug;
use std::hash::Hash;

/// An input delivered to a state machine.
///
/// Events are domain-level triggers, decoupled from whatever raw signal
/// produced them. Like states, they key the transition table.
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
