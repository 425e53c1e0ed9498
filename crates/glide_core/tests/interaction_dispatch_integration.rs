//! Integration tests for FSM + event sources + deferred dispatch
//!
//! These tests verify that:
//! - State changes seen by the machine's owner reach an observer list
//! - Observers see payloads in registration order
//! - Layout-deferred work coalesces across repeated triggers

use glide_core::{DeferredQueue, EventSource, Priority, StateMachine};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Grip {
    Released,
    Held,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Hand {
    Press,
    Release,
}

/// Owns a machine and raises "allowed" whenever the grip state changes
struct GripOwner {
    fsm: StateMachine<Grip, Hand>,
    allowed_changed: EventSource<bool>,
}

impl GripOwner {
    fn new() -> Self {
        Self {
            fsm: StateMachine::builder(Grip::Released)
                .on(Grip::Released, Hand::Press, Grip::Held)
                .on(Grip::Held, Hand::Release, Grip::Released)
                .build(),
            allowed_changed: EventSource::new(),
        }
    }

    fn send(&mut self, hand: Hand) {
        let before = self.fsm.current_state();
        let after = self.fsm.send(hand);
        if before != after {
            let mut allowed = after == Grip::Released;
            self.allowed_changed.emit(&mut allowed);
        }
    }
}

#[test]
fn test_state_changes_reach_observers() {
    let mut owner = GripOwner::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let first = seen.clone();
    owner
        .allowed_changed
        .subscribe(move |allowed| first.borrow_mut().push(("first", *allowed)));
    let second = seen.clone();
    owner
        .allowed_changed
        .subscribe(move |allowed| second.borrow_mut().push(("second", *allowed)));

    owner.send(Hand::Press);
    // Already held: no transition, no notification
    owner.send(Hand::Press);
    owner.send(Hand::Release);

    assert_eq!(
        *seen.borrow(),
        vec![
            ("first", false),
            ("second", false),
            ("first", true),
            ("second", true)
        ]
    );
}

/// Repeated layout passes schedule one recomputation
#[test]
fn test_deferred_work_coalesces() {
    #[derive(Debug, PartialEq)]
    enum Task {
        Recompute,
        Repaint,
    }

    let mut queue = DeferredQueue::new();
    for _ in 0..5 {
        queue.post(Task::Recompute, Priority::Low);
    }
    queue.post(Task::Repaint, Priority::Normal);

    assert_eq!(queue.drain(), vec![Task::Repaint, Task::Recompute]);
}
