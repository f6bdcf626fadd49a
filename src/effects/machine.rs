//! State machine that applies events and runs entry actions.

use crate::core::{Event, State, StateHistory, StateTransition};
use crate::effects::transition::{EntryAction, NoMatchPolicy, TransitionError};
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

/// Result of applying a single event
#[derive(Clone, Debug, PartialEq)]
pub enum Applied<S: State, O> {
    /// Moved to `to`; `effects` are the concatenated outputs of its entry
    /// actions, in registration order
    Transitioned { from: S, to: S, effects: Vec<O> },

    /// No edge matched and the policy is `Ignore`
    Ignored,
}

impl<S: State, O> Applied<S, O> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Deterministic state machine over states `S`, events `E`, a shared
/// context `C`, and entry-action outputs `O`.
///
/// Machines are built with [`StateMachineBuilder`](crate::builder::StateMachineBuilder);
/// the tables are fixed afterwards.
pub struct StateMachine<S: State, E: Event, C, O> {
    current: S,
    transitions: HashMap<(S, E), S>,
    entry_actions: HashMap<S, Vec<EntryAction<C, O>>>,
    no_match: NoMatchPolicy,
    history: StateHistory<S>,
}

impl<S: State, E: Event, C, O> StateMachine<S, E, C, O> {
    pub(crate) fn new(
        initial: S,
        transitions: HashMap<(S, E), S>,
        entry_actions: HashMap<S, Vec<EntryAction<C, O>>>,
        no_match: NoMatchPolicy,
    ) -> Self {
        Self {
            current: initial,
            transitions,
            entry_actions,
            no_match,
            history: StateHistory::new(),
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// Check if machine is in a final state (pure)
    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    /// Get state history (pure)
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn no_match_policy(&self) -> NoMatchPolicy {
        self.no_match
    }

    /// Whether an edge exists for `event` from the current state (pure)
    pub fn can_apply(&self, event: &E) -> bool {
        self.target_for(event).is_some()
    }

    fn target_for(&self, event: &E) -> Option<&S> {
        self.transitions
            .get(&(self.current.clone(), event.clone()))
    }

    /// Apply one external event.
    ///
    /// On a matching edge the current state is updated first, then the
    /// entry actions of the new state run synchronously against `context`.
    /// A failing action is not rolled back. Without a matching edge the
    /// machine and the context are left untouched.
    pub fn apply(&mut self, event: E, context: &mut C) -> Result<Applied<S, O>, TransitionError> {
        let Some(target) = self.target_for(&event).cloned() else {
            return match self.no_match {
                NoMatchPolicy::Ignore => {
                    debug!(
                        state = self.current.name(),
                        event = event.name(),
                        "no transition, event ignored"
                    );
                    Ok(Applied::Ignored)
                }
                NoMatchPolicy::Raise => Err(TransitionError::Unmatched {
                    state: self.current.name().to_string(),
                    event: event.name().to_string(),
                }),
            };
        };

        let from = std::mem::replace(&mut self.current, target.clone());
        self.history = self.history.record(StateTransition {
            from: from.clone(),
            to: target.clone(),
            event: event.name().to_string(),
            timestamp: Utc::now(),
        });
        debug!(
            from = from.name(),
            to = target.name(),
            event = event.name(),
            "state transition"
        );

        let mut effects = Vec::new();
        if let Some(actions) = self.entry_actions.get(&target) {
            for action in actions {
                let produced = action(context).map_err(|source| TransitionError::ActionFailed {
                    state: target.name().to_string(),
                    source,
                })?;
                effects.extend(produced);
            }
        }

        Ok(Applied::Transitioned {
            from,
            to: target,
            effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateMachineBuilder;
    use crate::effects::ActionError;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Light {
            Red,
            Green,
            Yellow,
            Off,
        }
        final: [Off]
    }

    event_enum! {
        enum Signal {
            Next,
            PowerCut,
        }
    }

    #[derive(Default)]
    struct Counter {
        entered: Vec<&'static str>,
    }

    type LightMachine = StateMachine<Light, Signal, Counter, String>;

    fn machine(policy: NoMatchPolicy) -> LightMachine {
        StateMachineBuilder::new(Light::Red)
            .add_transition(Light::Red, Signal::Next, Light::Green)
            .unwrap()
            .add_transition(Light::Green, Signal::Next, Light::Yellow)
            .unwrap()
            .add_transition(Light::Yellow, Signal::Next, Light::Red)
            .unwrap()
            .add_transition(Light::Green, Signal::PowerCut, Light::Off)
            .unwrap()
            .on_enter(Light::Green, |c: &mut Counter| {
                c.entered.push("green");
                Ok(vec!["go".to_string()])
            })
            .on_enter(Light::Green, |_c: &mut Counter| Ok(vec!["beep".to_string()]))
            .on_enter(Light::Off, |_c: &mut Counter| {
                Err(ActionError::new("fuse blown"))
            })
            .on_enter(Light::Off, |c: &mut Counter| {
                c.entered.push("off");
                Ok(vec![])
            })
            .no_match_policy(policy)
            .build()
            .unwrap()
    }

    #[test]
    fn build_does_not_run_initial_entry_actions() {
        let machine = StateMachineBuilder::<Light, Signal, Counter, String>::new(Light::Green)
            .add_transition(Light::Green, Signal::Next, Light::Yellow)
            .unwrap()
            .on_enter(Light::Green, |_c| Err(ActionError::new("must not run")))
            .build()
            .unwrap();

        assert_eq!(machine.current_state(), &Light::Green);
        assert!(machine.history().transitions().is_empty());
    }

    #[test]
    fn apply_runs_entry_actions_in_order() {
        let mut machine = machine(NoMatchPolicy::Ignore);
        let mut counter = Counter::default();

        let applied = machine.apply(Signal::Next, &mut counter).unwrap();

        assert_eq!(
            applied,
            Applied::Transitioned {
                from: Light::Red,
                to: Light::Green,
                effects: vec!["go".to_string(), "beep".to_string()],
            }
        );
        assert_eq!(counter.entered, vec!["green"]);
        assert_eq!(machine.current_state(), &Light::Green);
    }

    #[test]
    fn unmatched_event_is_ignored_by_default() {
        let mut machine = machine(NoMatchPolicy::Ignore);
        let mut counter = Counter::default();

        let applied = machine.apply(Signal::PowerCut, &mut counter).unwrap();

        assert_eq!(applied, Applied::Ignored);
        assert_eq!(machine.current_state(), &Light::Red);
        assert!(counter.entered.is_empty());
        assert!(machine.history().transitions().is_empty());
    }

    #[test]
    fn unmatched_event_raises_when_configured() {
        let mut machine = machine(NoMatchPolicy::Raise);
        let mut counter = Counter::default();

        let result = machine.apply(Signal::PowerCut, &mut counter);

        assert_eq!(
            result,
            Err(TransitionError::Unmatched {
                state: "Red".to_string(),
                event: "PowerCut".to_string(),
            })
        );
        assert_eq!(machine.current_state(), &Light::Red);
    }

    #[test]
    fn failing_action_keeps_new_state_and_skips_later_actions() {
        let mut machine = machine(NoMatchPolicy::Ignore);
        let mut counter = Counter::default();
        machine.apply(Signal::Next, &mut counter).unwrap();

        let result = machine.apply(Signal::PowerCut, &mut counter);

        assert!(matches!(
            result,
            Err(TransitionError::ActionFailed { ref state, .. }) if state == "Off"
        ));
        assert_eq!(machine.current_state(), &Light::Off);
        assert!(machine.is_final());
        assert_eq!(counter.entered, vec!["green"]);
    }

    #[test]
    fn history_tracks_applied_events() {
        let mut machine = machine(NoMatchPolicy::Ignore);
        let mut counter = Counter::default();

        for _ in 0..3 {
            machine.apply(Signal::Next, &mut counter).unwrap();
        }

        let path = machine.history().get_path();
        assert_eq!(
            path,
            vec![&Light::Red, &Light::Green, &Light::Yellow, &Light::Red]
        );
        assert!(machine
            .history()
            .transitions()
            .iter()
            .all(|t| t.event == "Next"));
    }

    #[test]
    fn can_apply_is_pure_lookup() {
        let machine = machine(NoMatchPolicy::Ignore);
        assert!(machine.can_apply(&Signal::Next));
        assert!(!machine.can_apply(&Signal::PowerCut));
        assert_eq!(machine.current_state(), &Light::Red);
    }
}
