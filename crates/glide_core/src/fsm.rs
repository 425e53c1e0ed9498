//! State Machine Runtime
//!
//! Flat statecharts for controller interaction states: typed states and
//! events with a `(state, event) -> state` transition table. Events with no
//! transition from the current state leave the machine where it is.
//!
//! Owners that need to react to a state change compare the state returned by
//! [`StateMachine::send`] with the one before it.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Builder for creating state machines
#[derive(Debug)]
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to). A later transition for the same
    /// state and event replaces the earlier one.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.insert((from, event), to);
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
        }
    }
}

/// A state machine instance
#[derive(Debug)]
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Send an event to the state machine, potentially triggering a transition.
    ///
    /// Returns the state after the event.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;
        let Some(&to_state) = self.transitions.get(&(current, event)) else {
            tracing::trace!(state = ?current, event = ?event, "event ignored");
            return current;
        };

        self.current_state = to_state;
        tracing::trace!(from = ?current, event = ?event, to = ?to_state, "transition");
        to_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Phase {
        Idle,
        Pressed,
        Dragging,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Input {
        Down,
        Move,
        Up,
    }

    fn drag_machine() -> StateMachine<Phase, Input> {
        StateMachine::builder(Phase::Idle)
            .on(Phase::Idle, Input::Down, Phase::Pressed)
            .on(Phase::Pressed, Input::Move, Phase::Dragging)
            .on(Phase::Pressed, Input::Up, Phase::Idle)
            .on(Phase::Dragging, Input::Up, Phase::Idle)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = drag_machine();
        assert_eq!(fsm.current_state(), Phase::Idle);

        assert_eq!(fsm.send(Input::Down), Phase::Pressed);
        assert_eq!(fsm.send(Input::Move), Phase::Dragging);
        assert_eq!(fsm.send(Input::Up), Phase::Idle);
        assert!(fsm.is_in(Phase::Idle));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = drag_machine();

        // Move is not valid while idle
        assert_eq!(fsm.send(Input::Move), Phase::Idle);
        fsm.send(Input::Down);
        assert_eq!(fsm.send(Input::Down), Phase::Pressed);
    }

    #[test]
    fn test_later_transition_replaces_earlier() {
        let mut fsm = StateMachine::builder(Phase::Idle)
            .on(Phase::Idle, Input::Down, Phase::Pressed)
            .on(Phase::Idle, Input::Down, Phase::Dragging)
            .build();
        assert_eq!(fsm.send(Input::Down), Phase::Dragging);
    }
}
