//! Core State trait for state machine states.
//!
//! All state machine states must implement this trait, which provides
//! pure methods for inspecting state properties without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States are small immutable
/// values used as keys in a transition table, so they must be hashable.
///
/// # Required Traits
///
/// - `Clone`: States are copied into history records
/// - `Eq` + `Hash`: States key the transition and entry-action tables
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States appear in persisted cycle reports
///
/// # Example
///
/// ```rust
/// use touchprobe::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Leg {
///     Waiting,
///     Approach,
///     Done,
/// }
///
/// impl State for Leg {
///     fn name(&self) -> &str {
///         match self {
///             Self::Waiting => "Waiting",
///             Self::Approach => "Approach",
///             Self::Done => "Done",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Done)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Entering a final state ends the workflow that owns the machine.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
