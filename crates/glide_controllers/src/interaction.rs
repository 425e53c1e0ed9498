//! Interaction state machine
//!
//! Tracks whether the user is currently driving the controller (pressing or
//! dragging its thumb) and derives whether the host may start interactions
//! of its own through the controller.

use glide_core::StateMachine;
use serde::{Deserialize, Serialize};

/// Whether the user is driving the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Interacting,
}

/// Inputs to the interaction state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    /// Pointer captured by the thumb, or a drag started
    Press,
    /// Pointer released, or the drag completed
    Release,
}

/// Host-controlled scroll mode for one axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    Disabled,
    #[default]
    Enabled,
}

/// Interaction state plus the inputs of the derived "allowed" flag
pub struct InteractionTracker {
    machine: StateMachine<InteractionState, InteractionEvent>,
    scroll_mode: ScrollMode,
    host_enabled: bool,
    allowed: bool,
}

impl InteractionTracker {
    pub fn new() -> Self {
        let machine = StateMachine::builder(InteractionState::Idle)
            .on(
                InteractionState::Idle,
                InteractionEvent::Press,
                InteractionState::Interacting,
            )
            .on(
                InteractionState::Interacting,
                InteractionEvent::Release,
                InteractionState::Idle,
            )
            .build();

        let mut tracker = Self {
            machine,
            scroll_mode: ScrollMode::default(),
            host_enabled: true,
            allowed: false,
        };
        tracker.allowed = tracker.compute_allowed();
        tracker
    }

    pub fn state(&self) -> InteractionState {
        self.machine.current_state()
    }

    pub fn is_interacting(&self) -> bool {
        self.machine.is_in(InteractionState::Interacting)
    }

    /// True when the host may start controller interactions.
    ///
    /// Forced false while interacting; otherwise requires an enabled scroll
    /// mode and an enabled host.
    pub fn are_interactions_allowed(&self) -> bool {
        self.allowed
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    pub fn is_enabled(&self) -> bool {
        self.host_enabled
    }

    /// Feed an event. Returns true if the allowed flag changed.
    pub fn send(&mut self, event: InteractionEvent) -> bool {
        self.machine.send(event);
        self.refresh()
    }

    /// Returns true if the allowed flag changed
    pub fn set_scroll_mode(&mut self, mode: ScrollMode) -> bool {
        self.scroll_mode = mode;
        self.refresh()
    }

    /// Returns true if the allowed flag changed
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.host_enabled = enabled;
        self.refresh()
    }

    fn compute_allowed(&self) -> bool {
        !self.is_interacting() && self.scroll_mode != ScrollMode::Disabled && self.host_enabled
    }

    fn refresh(&mut self) -> bool {
        let allowed = self.compute_allowed();
        let changed = allowed != self.allowed;
        self.allowed = allowed;
        changed
    }
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InteractionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionTracker")
            .field("state", &self.state())
            .field("scroll_mode", &self.scroll_mode)
            .field("host_enabled", &self.host_enabled)
            .field("allowed", &self.allowed)
            .finish()
    }
}
