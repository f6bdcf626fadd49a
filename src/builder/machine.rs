//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{Event, State};
use crate::effects::{ActionError, EntryAction, NoMatchPolicy, StateMachine};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```
/// use touchprobe::builder::StateMachineBuilder;
/// use touchprobe::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// event_enum! {
///     enum Push {
///         Toggle,
///     }
/// }
///
/// let mut machine = StateMachineBuilder::<Door, Push, u32, ()>::new(Door::Closed)
///     .add_transition(Door::Closed, Push::Toggle, Door::Open)?
///     .add_transition(Door::Open, Push::Toggle, Door::Closed)?
///     .on_enter(Door::Open, |opened: &mut u32| {
///         *opened += 1;
///         Ok(vec![])
///     })
///     .build()?;
///
/// let mut opened = 0;
/// machine.apply(Push::Toggle, &mut opened).unwrap();
/// assert_eq!(machine.current_state(), &Door::Open);
/// assert_eq!(opened, 1);
/// # Ok::<(), touchprobe::builder::BuildError>(())
/// ```
pub struct StateMachineBuilder<S: State, E: Event, C, O> {
    initial: S,
    transitions: HashMap<(S, E), S>,
    entry_actions: HashMap<S, Vec<EntryAction<C, O>>>,
    no_match: NoMatchPolicy,
}

impl<S: State, E: Event, C, O> StateMachineBuilder<S, E, C, O> {
    /// Start a definition positioned at `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            transitions: HashMap::new(),
            entry_actions: HashMap::new(),
            no_match: NoMatchPolicy::default(),
        }
    }

    /// Register one deterministic edge.
    /// Returns an error if an edge already exists for `(from, event)`.
    pub fn add_transition(mut self, from: S, event: E, to: S) -> Result<Self, BuildError> {
        match self.transitions.entry((from, event)) {
            Entry::Occupied(occupied) => {
                let (from, event) = occupied.key();
                Err(BuildError::DuplicateTransition {
                    from: from.name().to_string(),
                    event: event.name().to_string(),
                })
            }
            Entry::Vacant(vacant) => {
                vacant.insert(to);
                Ok(self)
            }
        }
    }

    /// Register a whole table of edges at once.
    pub fn transitions<I>(self, edges: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (S, E, S)>,
    {
        edges
            .into_iter()
            .try_fold(self, |builder, (from, event, to)| {
                builder.add_transition(from, event, to)
            })
    }

    /// Register an action run every time `state` is entered.
    /// Several actions for the same state run in registration order.
    pub fn on_enter<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(&mut C) -> Result<Vec<O>, ActionError> + Send + Sync + 'static,
    {
        self.entry_actions
            .entry(state)
            .or_default()
            .push(Arc::new(action));
        self
    }

    /// Set how `apply` treats events with no matching edge.
    pub fn no_match_policy(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Build the state machine.
    ///
    /// Entry actions of the initial state are not run.
    pub fn build(self) -> Result<StateMachine<S, E, C, O>, BuildError> {
        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        Ok(StateMachine::new(
            self.initial,
            self.transitions,
            self.entry_actions,
            self.no_match,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Waiting,
            Approach,
            Done,
        }
        final: [Done]
    }

    event_enum! {
        enum TestEvent {
            Start,
            Probed,
        }
    }

    type Builder = StateMachineBuilder<TestState, TestEvent, (), ()>;

    #[test]
    fn builder_requires_transitions() {
        let result = Builder::new(TestState::Waiting).build();

        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn builder_rejects_duplicate_edges() {
        let result = Builder::new(TestState::Waiting)
            .add_transition(TestState::Waiting, TestEvent::Start, TestState::Approach)
            .and_then(|b| b.add_transition(TestState::Waiting, TestEvent::Start, TestState::Done));

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateTransition {
                from: "Waiting".to_string(),
                event: "Start".to_string(),
            })
        );
    }

    #[test]
    fn same_event_from_different_states_is_allowed() {
        let machine = Builder::new(TestState::Waiting)
            .transitions([
                (TestState::Waiting, TestEvent::Start, TestState::Approach),
                (TestState::Approach, TestEvent::Start, TestState::Done),
            ])
            .and_then(|b| b.build());

        assert!(machine.is_ok());
    }

    #[test]
    fn table_with_duplicate_is_rejected() {
        let result = Builder::new(TestState::Waiting).transitions([
            (TestState::Waiting, TestEvent::Start, TestState::Approach),
            (TestState::Approach, TestEvent::Probed, TestState::Done),
            (TestState::Approach, TestEvent::Probed, TestState::Waiting),
        ]);

        assert!(matches!(
            result,
            Err(BuildError::DuplicateTransition { .. })
        ));
    }

    #[test]
    fn fluent_api_builds_machine_at_initial_state() {
        let machine = Builder::new(TestState::Waiting)
            .add_transition(TestState::Waiting, TestEvent::Start, TestState::Approach)
            .unwrap()
            .no_match_policy(NoMatchPolicy::Raise)
            .build()
            .unwrap();

        assert_eq!(machine.current_state(), &TestState::Waiting);
        assert_eq!(machine.no_match_policy(), NoMatchPolicy::Raise);
    }
}
