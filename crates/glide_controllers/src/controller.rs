//! The scroll-controller contract
//!
//! A host scrollable surface owns up to one controller per axis. It pushes
//! dimensions and completions down through [`ScrollController`]; the
//! controller raises requests up through the event sources in
//! [`ControllerEvents`].

use glide_animation::ScrollAnimation;
use glide_core::{EventSource, Orientation, PointerInfo, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::correlation::{CorrelationId, CorrelationTracker, OperationKind, PendingOperation, Requested};
use crate::dimensions::AxisDimensions;
use crate::error::{ensure_finite, Result};
use crate::interaction::{InteractionEvent, InteractionTracker, ScrollMode};

// ============================================================================
// Request Payloads
// ============================================================================

/// Whether the host animates a requested offset change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationMode {
    /// Jump straight to the new offset
    Disabled,
    /// Always animate
    Enabled,
    /// Let the host decide
    #[default]
    Auto,
}

/// Whether the host applies snap points to a requested offset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPointsMode {
    #[default]
    Default,
    Ignore,
}

/// Options attached to scroll-to and scroll-by requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollOptions {
    #[serde(default)]
    pub animation: AnimationMode,
    #[serde(default)]
    pub snap_points: SnapPointsMode,
}

impl ScrollOptions {
    pub const fn new(animation: AnimationMode, snap_points: SnapPointsMode) -> Self {
        Self {
            animation,
            snap_points,
        }
    }

    /// No animation, no snapping. Used while the user drags a thumb.
    pub const fn immediate() -> Self {
        Self::new(AnimationMode::Disabled, SnapPointsMode::Ignore)
    }
}

/// Snapshot of the interaction-related state a host reads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InteractionInfo {
    pub are_interactions_allowed: bool,
    pub is_interacting: bool,
    /// Two-axis drags are constrained to their dominant axis
    pub is_rail_enabled: bool,
    /// The controller exposes an element the host may pan directly
    pub interaction_element_available: bool,
}

/// A touch or pen press the host should turn into a manipulation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionRequest {
    pub pointer: PointerInfo,
    /// Set by the host when it took over the pointer
    pub handled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollToRequest {
    pub offset: f64,
    pub options: ScrollOptions,
    /// Filled in by the host; left `None` when it does not track the request
    pub correlation_id: Option<CorrelationId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollByRequest {
    pub delta: f64,
    pub options: ScrollOptions,
    pub correlation_id: Option<CorrelationId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AddVelocityRequest {
    pub velocity: f64,
    /// `None` means the host's default decay, not zero
    pub inertia_decay: Option<f32>,
    pub correlation_id: Option<CorrelationId>,
}

/// Raised locally once a tracked operation completes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCompleted {
    pub correlation_id: CorrelationId,
    pub kind: OperationKind,
    pub relative_change: f64,
}

// ============================================================================
// Event Sources
// ============================================================================

/// Every signal a controller raises
#[derive(Debug, Default)]
pub struct ControllerEvents {
    pub interaction_info_changed: EventSource<InteractionInfo>,
    pub interaction_requested: EventSource<InteractionRequest>,
    pub scroll_to_requested: EventSource<ScrollToRequest>,
    pub scroll_by_requested: EventSource<ScrollByRequest>,
    pub add_velocity_requested: EventSource<AddVelocityRequest>,
    pub scroll_completed: EventSource<ScrollCompleted>,
}

impl ControllerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the host's correlation id, or `None` with no listener
    pub fn raise_scroll_to(&mut self, offset: f64, options: ScrollOptions) -> Option<CorrelationId> {
        if self.scroll_to_requested.is_empty() {
            trace!(offset, "scroll-to raised with no listener");
            return None;
        }
        let mut request = ScrollToRequest {
            offset,
            options,
            correlation_id: None,
        };
        self.scroll_to_requested.emit(&mut request);
        request.correlation_id
    }

    pub fn raise_scroll_by(&mut self, delta: f64, options: ScrollOptions) -> Option<CorrelationId> {
        if self.scroll_by_requested.is_empty() {
            trace!(delta, "scroll-by raised with no listener");
            return None;
        }
        let mut request = ScrollByRequest {
            delta,
            options,
            correlation_id: None,
        };
        self.scroll_by_requested.emit(&mut request);
        request.correlation_id
    }

    pub fn raise_add_velocity(
        &mut self,
        velocity: f64,
        inertia_decay: Option<f32>,
    ) -> Option<CorrelationId> {
        if self.add_velocity_requested.is_empty() {
            trace!(velocity, "add-velocity raised with no listener");
            return None;
        }
        let mut request = AddVelocityRequest {
            velocity,
            inertia_decay,
            correlation_id: None,
        };
        self.add_velocity_requested.emit(&mut request);
        request.correlation_id
    }

    /// Returns true if a listener handled the press
    pub fn raise_interaction_requested(&mut self, pointer: PointerInfo) -> bool {
        let mut request = InteractionRequest {
            pointer,
            handled: false,
        };
        self.interaction_requested.emit(&mut request);
        request.handled
    }
}

// ============================================================================
// Shared Controller State
// ============================================================================

/// State every single-axis controller carries: dimensions, pending
/// operations, interaction state and event sources.
#[derive(Debug)]
pub struct ControllerCore {
    orientation: Orientation,
    dimensions: AxisDimensions,
    /// Offset the controller shows. Lags the host while operations are pending.
    displayed_offset: f64,
    /// Offset the controller expects once pending operations complete
    offset_target: f64,
    pending: CorrelationTracker,
    interaction: InteractionTracker,
    events: ControllerEvents,
    rail_enabled: bool,
    element_available: bool,
}

impl ControllerCore {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            dimensions: AxisDimensions::default(),
            displayed_offset: 0.0,
            offset_target: 0.0,
            pending: CorrelationTracker::new(),
            interaction: InteractionTracker::new(),
            events: ControllerEvents::new(),
            rail_enabled: false,
            element_available: false,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn dimensions(&self) -> &AxisDimensions {
        &self.dimensions
    }

    /// Displayed offset, kept inside the current range
    pub fn displayed_offset(&self) -> f64 {
        self.dimensions.clamp(self.displayed_offset)
    }

    pub(crate) fn set_displayed_offset(&mut self, offset: f64) {
        self.displayed_offset = self.dimensions.clamp(offset);
    }

    pub fn offset_target(&self) -> f64 {
        self.offset_target
    }

    pub(crate) fn set_offset_target(&mut self, offset: f64) {
        self.offset_target = self.dimensions.clamp(offset);
    }

    pub fn pending(&self) -> &CorrelationTracker {
        &self.pending
    }

    pub fn events(&self) -> &ControllerEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut ControllerEvents {
        &mut self.events
    }

    pub fn interaction(&self) -> &InteractionTracker {
        &self.interaction
    }

    /// Validate and store new dimensions.
    ///
    /// Returns whether the range or viewport changed. On error nothing
    /// changes.
    pub fn apply_dimensions(
        &mut self,
        offset: f64,
        min_offset: f64,
        max_offset: f64,
        viewport: f64,
    ) -> Result<bool> {
        let dims = AxisDimensions::new(offset, min_offset, max_offset, viewport)?;
        let extent_changed = dims.extent_differs(&self.dimensions);
        self.dimensions = dims;

        if self.pending.is_empty() {
            self.displayed_offset = dims.offset();
            self.offset_target = dims.offset();
        } else {
            self.offset_target = dims.clamp(self.offset_target);
        }

        debug!(
            orientation = %self.orientation,
            offset = dims.offset(),
            min_offset,
            max_offset,
            viewport,
            pending = self.pending.len(),
            "dimensions set"
        );
        Ok(extent_changed)
    }

    /// Raise a scroll-to and track it if the host returns an id
    pub fn request_scroll_to(
        &mut self,
        offset: f64,
        options: ScrollOptions,
        relative_change: f64,
    ) -> Result<Option<CorrelationId>> {
        ensure_finite("offset", offset)?;
        let id = self.events.raise_scroll_to(offset, options);
        debug!(orientation = %self.orientation, offset, ?options, id = ?id, "scroll-to requested");
        if let Some(id) = id {
            let target = self.dimensions.clamp(offset);
            self.pending.track(PendingOperation::new(
                id,
                Requested::Target(offset),
                relative_change,
                target,
            ));
        }
        Ok(id)
    }

    /// Raise a scroll-by and track it if the host returns an id
    pub fn request_scroll_by(
        &mut self,
        delta: f64,
        options: ScrollOptions,
    ) -> Result<Option<CorrelationId>> {
        ensure_finite("delta", delta)?;
        let id = self.events.raise_scroll_by(delta, options);
        debug!(orientation = %self.orientation, delta, ?options, id = ?id, "scroll-by requested");
        if let Some(id) = id {
            let target = self.dimensions.clamp(self.offset_target + delta);
            self.pending.track(PendingOperation::new(
                id,
                Requested::Delta(delta),
                delta,
                target,
            ));
        }
        Ok(id)
    }

    /// Raise an add-velocity and track it if the host returns an id
    pub fn request_add_velocity(
        &mut self,
        velocity: f64,
        inertia_decay: Option<f32>,
    ) -> Result<Option<CorrelationId>> {
        ensure_finite("velocity", velocity)?;
        if let Some(decay) = inertia_decay {
            ensure_finite("inertia_decay", decay as f64)?;
        }
        let id = self.events.raise_add_velocity(velocity, inertia_decay);
        debug!(orientation = %self.orientation, velocity, ?inertia_decay, id = ?id, "add-velocity requested");
        if let Some(id) = id {
            self.pending.track(PendingOperation::new(
                id,
                Requested::Velocity {
                    velocity,
                    inertia_decay,
                },
                0.0,
                self.offset_target,
            ));
        }
        Ok(id)
    }

    /// Resolve a completion from the host.
    ///
    /// Untracked ids are ignored. Once nothing is pending the displayed
    /// offset catches up with the last reported one.
    pub fn complete(&mut self, id: CorrelationId) -> Option<PendingOperation> {
        let operation = self.pending.complete(id)?;

        if self.pending.is_empty() {
            self.displayed_offset = self.dimensions.offset();
            self.offset_target = self.dimensions.offset();
        }

        let mut args = ScrollCompleted {
            correlation_id: id,
            kind: operation.kind(),
            relative_change: operation.relative_change,
        };
        self.events.scroll_completed.emit(&mut args);
        Some(operation)
    }

    // ------------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------------

    pub fn interaction_info(&self) -> InteractionInfo {
        InteractionInfo {
            are_interactions_allowed: self.interaction.are_interactions_allowed(),
            is_interacting: self.interaction.is_interacting(),
            is_rail_enabled: self.rail_enabled,
            interaction_element_available: self.element_available,
        }
    }

    pub fn raise_interaction_info_changed(&mut self) {
        let mut info = self.interaction_info();
        trace!(orientation = %self.orientation, ?info, "interaction info changed");
        self.events.interaction_info_changed.emit(&mut info);
    }

    /// Drive the interaction state machine, raising info on a change
    pub fn send_interaction(&mut self, event: InteractionEvent) {
        let was_interacting = self.interaction.is_interacting();
        let allowed_changed = self.interaction.send(event);
        if allowed_changed || was_interacting != self.interaction.is_interacting() {
            self.raise_interaction_info_changed();
        }
    }

    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        debug!(orientation = %self.orientation, ?mode, "scroll mode set");
        if self.interaction.set_scroll_mode(mode) {
            self.raise_interaction_info_changed();
        }
    }

    /// Enabled-state changes always raise interaction info exactly once
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.interaction.is_enabled() == enabled {
            return;
        }
        self.interaction.set_enabled(enabled);
        self.raise_interaction_info_changed();
    }

    pub fn is_enabled(&self) -> bool {
        self.interaction.is_enabled()
    }

    /// Returns true if the value changed
    pub(crate) fn set_rail_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.rail_enabled != enabled;
        self.rail_enabled = enabled;
        changed
    }

    /// Returns true if the value changed
    pub(crate) fn set_element_available(&mut self, available: bool) -> bool {
        let changed = self.element_available != available;
        self.element_available = available;
        changed
    }
}

// ============================================================================
// ScrollController
// ============================================================================

/// The adapter contract between a host surface and one scroll axis.
///
/// Implementors provide access to their [`ControllerCore`]; the provided
/// methods cover the parts of the contract every controller shares.
pub trait ScrollController {
    fn core(&self) -> &ControllerCore;

    fn core_mut(&mut self) -> &mut ControllerCore;

    fn orientation(&self) -> Orientation {
        self.core().orientation()
    }

    fn dimensions(&self) -> AxisDimensions {
        *self.core().dimensions()
    }

    /// Push the host's offset, range and viewport.
    ///
    /// Fails with [`ScrollError::InvalidArgument`](crate::ScrollError) when
    /// `max_offset < min_offset`, `viewport < 0` or any value is not finite,
    /// leaving prior state untouched.
    fn set_dimensions(
        &mut self,
        offset: f64,
        min_offset: f64,
        max_offset: f64,
        viewport: f64,
    ) -> Result<()> {
        self.core_mut()
            .apply_dimensions(offset, min_offset, max_offset, viewport)
            .map(|_| ())
    }

    fn scroll_mode(&self) -> ScrollMode {
        self.core().interaction().scroll_mode()
    }

    fn set_scroll_mode(&mut self, mode: ScrollMode) {
        self.core_mut().set_scroll_mode(mode);
    }

    fn is_enabled(&self) -> bool {
        self.core().is_enabled()
    }

    /// Host enabled-state
    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().set_enabled(enabled);
    }

    /// A previously requested change finished or was cancelled
    fn notify_completed(&mut self, id: CorrelationId) {
        self.core_mut().complete(id);
    }

    /// Let the controller replace the animation the host would play for
    /// `id`. Controllers without a custom curve return `default`.
    fn scroll_animation(
        &mut self,
        id: CorrelationId,
        current_position: Vec2,
        default: ScrollAnimation,
    ) -> ScrollAnimation {
        trace!(id = %id, ?current_position, "default scroll animation kept");
        default
    }

    fn interaction_info(&self) -> InteractionInfo {
        self.core().interaction_info()
    }

    fn are_interactions_allowed(&self) -> bool {
        self.core().interaction().are_interactions_allowed()
    }

    fn events_mut(&mut self) -> &mut ControllerEvents {
        self.core_mut().events_mut()
    }

    fn pending_operations(&self) -> &CorrelationTracker {
        self.core().pending()
    }

    fn scroll_to(&mut self, offset: f64, options: ScrollOptions) -> Result<Option<CorrelationId>> {
        let core = self.core_mut();
        let relative_change = offset - core.offset_target();
        let id = core.request_scroll_to(offset, options, relative_change)?;
        if id.is_some() {
            core.set_offset_target(offset);
        }
        Ok(id)
    }

    fn scroll_by(&mut self, delta: f64, options: ScrollOptions) -> Result<Option<CorrelationId>> {
        let core = self.core_mut();
        let id = core.request_scroll_by(delta, options)?;
        if id.is_some() {
            let target = core.offset_target() + delta;
            core.set_offset_target(target);
        }
        Ok(id)
    }

    fn add_velocity(
        &mut self,
        velocity: f64,
        inertia_decay: Option<f32>,
    ) -> Result<Option<CorrelationId>> {
        self.core_mut().request_add_velocity(velocity, inertia_decay)
    }

    /// Supersede any in-flight change with a zero-delta request
    fn halt(&mut self) -> Result<Option<CorrelationId>> {
        self.scroll_by(0.0, ScrollOptions::immediate())
    }

    /// Run work deferred until after the host's layout pass
    fn process_deferred(&mut self) {}

    /// True if [`process_deferred`](Self::process_deferred) has work to do
    fn has_deferred_work(&self) -> bool {
        false
    }
}
