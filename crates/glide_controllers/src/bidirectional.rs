//! Two-axis controller
//!
//! One 2D thumb inside a rectangular track drives a pair of single-axis
//! controllers, one per orientation. The host sees two ordinary
//! [`ScrollController`]s; requests that span both axes are raised on each
//! and the returned correlation ids are reconciled.

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::{DeferredQueue, EventSource, HandlerId, Orientation, PointerDevice, PointerInfo, Priority, Vec2};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ControllerConfig;
use crate::controller::{AnimationMode, ControllerCore, ScrollController, ScrollOptions, SnapPointsMode};
use crate::correlation::{reconcile, CorrelationId, OperationKind, Reconciled};
use crate::error::{ensure_finite, Result, ScrollError};
use crate::interaction::InteractionEvent;
use crate::mapping::ThumbTrack;

// ============================================================================
// Axis controller
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeferredTask {
    UpdateMultiplier,
}

/// One axis of a [`BiDirectionalScrollController`]
#[derive(Debug)]
pub struct UniScrollController {
    core: ControllerCore,
    track: ThumbTrack,
    deferred: DeferredQueue<DeferredTask>,
}

impl UniScrollController {
    fn new(orientation: Orientation, min_thumb_length: f64) -> Self {
        let mut core = ControllerCore::new(orientation);
        core.set_element_available(true);
        Self {
            core,
            track: ThumbTrack::new(min_thumb_length),
            deferred: DeferredQueue::new(),
        }
    }

    pub fn thumb_length(&self) -> f64 {
        self.track.thumb_length()
    }

    pub fn thumb_position(&self) -> f64 {
        self.track
            .position(self.core.displayed_offset(), self.core.dimensions())
    }

    pub fn offset_multiplier(&self) -> f64 {
        self.track.multiplier()
    }

    fn max_thumb_position(&self) -> f64 {
        self.track.travel()
    }

    fn offset_at(&self, position: f64) -> f64 {
        self.track.offset_at(position, self.core.dimensions())
    }

    fn set_track_length(&mut self, track_length: f64) {
        self.track.set_track_length(track_length);
        self.track.update_thumb_length(self.core.dimensions());
        self.track.update_multiplier(self.core.dimensions());
    }
}

impl ScrollController for UniScrollController {
    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn set_dimensions(
        &mut self,
        offset: f64,
        min_offset: f64,
        max_offset: f64,
        viewport: f64,
    ) -> Result<()> {
        let extent_changed = self
            .core
            .apply_dimensions(offset, min_offset, max_offset, viewport)?;
        if extent_changed {
            if self.track.update_thumb_length(self.core.dimensions()) {
                self.deferred
                    .post(DeferredTask::UpdateMultiplier, Priority::Low);
            } else {
                self.track.update_multiplier(self.core.dimensions());
            }
        }
        Ok(())
    }

    fn process_deferred(&mut self) {
        for task in self.deferred.drain() {
            match task {
                DeferredTask::UpdateMultiplier => {
                    let multiplier = self.track.update_multiplier(self.core.dimensions());
                    trace!(orientation = %self.core.orientation(), multiplier, "multiplier updated");
                }
            }
        }
    }

    fn has_deferred_work(&self) -> bool {
        !self.deferred.is_empty()
    }
}

// ============================================================================
// View changes
// ============================================================================

/// Raised when a two-axis request started through the public API completes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewChangeCompleted {
    pub correlation_id: CorrelationId,
    pub kind: OperationKind,
    pub relative_change: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct ViewChange {
    kind: OperationKind,
    relative_change: Vec2,
    /// Gesture-driven changes complete silently
    raise_completed: bool,
}

/// Two-axis operations, completed by whichever axis reports first
#[derive(Default)]
struct ViewChanges {
    pending: IndexMap<CorrelationId, ViewChange, FxBuildHasher>,
    completed: EventSource<ViewChangeCompleted>,
}

impl ViewChanges {
    fn track(&mut self, reconciled: Reconciled, change: ViewChange) {
        for id in reconciled.ids() {
            self.pending.entry(id).or_insert(change);
        }
    }

    fn axis_completed(&mut self, id: CorrelationId) {
        let Some(change) = self.pending.shift_remove(&id) else {
            return;
        };
        debug!(id = %id, kind = ?change.kind, "view change completed");
        if change.raise_completed {
            let mut args = ViewChangeCompleted {
                correlation_id: id,
                kind: change.kind,
                relative_change: change.relative_change,
            };
            self.completed.emit(&mut args);
        }
    }
}

// ============================================================================
// Two-axis controller
// ============================================================================

/// Directional repeat buttons around the 2D thumb
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityDirection {
    BothDecrement,
    BothIncrement,
    HorizontalIncrementVerticalDecrement,
    HorizontalDecrementVerticalIncrement,
    HorizontalDecrement,
    HorizontalIncrement,
    VerticalDecrement,
    VerticalIncrement,
}

impl VelocityDirection {
    /// Unit direction, -1, 0 or 1 per axis
    pub fn signs(self) -> Vec2 {
        match self {
            VelocityDirection::BothDecrement => Vec2::new(-1.0, -1.0),
            VelocityDirection::BothIncrement => Vec2::new(1.0, 1.0),
            VelocityDirection::HorizontalIncrementVerticalDecrement => Vec2::new(1.0, -1.0),
            VelocityDirection::HorizontalDecrementVerticalIncrement => Vec2::new(-1.0, 1.0),
            VelocityDirection::HorizontalDecrement => Vec2::new(-1.0, 0.0),
            VelocityDirection::HorizontalIncrement => Vec2::new(1.0, 0.0),
            VelocityDirection::VerticalDecrement => Vec2::new(0.0, -1.0),
            VelocityDirection::VerticalIncrement => Vec2::new(0.0, 1.0),
        }
    }
}

/// A 2D thumb driving a horizontal and a vertical axis
pub struct BiDirectionalScrollController {
    horizontal: UniScrollController,
    vertical: UniScrollController,
    view_changes: Rc<RefCell<ViewChanges>>,
    config: ControllerConfig,
    railing: bool,
    /// Thumb position when the current mouse drag started
    drag_origin: Option<Vec2>,
}

impl BiDirectionalScrollController {
    pub fn new() -> Self {
        Self::build(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ControllerConfig) -> Self {
        let view_changes = Rc::new(RefCell::new(ViewChanges::default()));
        let mut horizontal = UniScrollController::new(Orientation::Horizontal, config.min_thumb_length);
        let mut vertical = UniScrollController::new(Orientation::Vertical, config.min_thumb_length);

        for axis in [&mut horizontal, &mut vertical] {
            let changes = view_changes.clone();
            axis.core
                .events_mut()
                .scroll_completed
                .subscribe(move |done| changes.borrow_mut().axis_completed(done.correlation_id));
            axis.core.set_rail_enabled(true);
        }

        Self {
            horizontal,
            vertical,
            view_changes,
            config,
            railing: true,
            drag_origin: None,
        }
    }

    pub fn horizontal(&self) -> &UniScrollController {
        &self.horizontal
    }

    pub fn vertical(&self) -> &UniScrollController {
        &self.vertical
    }

    pub fn axis(&self, orientation: Orientation) -> &UniScrollController {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    /// The axis controller the host drives for `orientation`
    pub fn axis_mut(&mut self, orientation: Orientation) -> &mut UniScrollController {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    /// Subscribe to completions of requests started through
    /// [`scroll_to`](Self::scroll_to), [`scroll_by`](Self::scroll_by) and
    /// [`add_velocity`](Self::add_velocity)
    pub fn on_scroll_completed<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&mut ViewChangeCompleted) + 'static,
    {
        self.view_changes.borrow_mut().completed.subscribe(handler)
    }

    pub fn unsubscribe_scroll_completed(&mut self, id: HandlerId) -> bool {
        self.view_changes.borrow_mut().completed.unsubscribe(id)
    }

    /// Two-axis operations still waiting on a completion
    pub fn pending_view_changes(&self) -> usize {
        self.view_changes.borrow().pending.len()
    }

    /// Forward a completion to both axes
    pub fn notify_completed(&mut self, id: CorrelationId) {
        self.horizontal.notify_completed(id);
        self.vertical.notify_completed(id);
    }

    pub fn process_deferred(&mut self) {
        self.horizontal.process_deferred();
        self.vertical.process_deferred();
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    pub fn set_track_size(&mut self, size: Vec2) -> Result<()> {
        ensure_finite("track_width", size.x)?;
        ensure_finite("track_height", size.y)?;
        if size.x < 0.0 || size.y < 0.0 {
            let value = size.x.min(size.y);
            return Err(ScrollError::invalid("track_size", value, "must not be negative"));
        }
        self.horizontal.set_track_length(size.x);
        self.vertical.set_track_length(size.y);
        Ok(())
    }

    pub fn thumb_size(&self) -> Vec2 {
        Vec2::new(self.horizontal.thumb_length(), self.vertical.thumb_length())
    }

    pub fn thumb_position(&self) -> Vec2 {
        Vec2::new(self.horizontal.thumb_position(), self.vertical.thumb_position())
    }

    pub fn max_thumb_position(&self) -> Vec2 {
        Vec2::new(
            self.horizontal.max_thumb_position(),
            self.vertical.max_thumb_position(),
        )
    }

    /// Offsets that put the thumb at `position`
    pub fn offset_for_thumb_position(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.horizontal.offset_at(position.x),
            self.vertical.offset_at(position.y),
        )
    }

    fn current_offset(&self) -> Vec2 {
        Vec2::new(
            self.horizontal.core.displayed_offset(),
            self.vertical.core.displayed_offset(),
        )
    }

    // ------------------------------------------------------------------------
    // Interaction state
    // ------------------------------------------------------------------------

    pub fn is_railing(&self) -> bool {
        self.railing
    }

    /// Constrain drags to their dominant axis
    pub fn set_railing(&mut self, railing: bool) {
        if self.railing == railing {
            return;
        }
        self.railing = railing;
        for axis in [&mut self.horizontal, &mut self.vertical] {
            axis.core.set_rail_enabled(railing);
            axis.core.raise_interaction_info_changed();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.horizontal.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.on_drag_completed();
        }
        for axis in [&mut self.horizontal, &mut self.vertical] {
            axis.core.set_element_available(enabled);
            axis.set_enabled(enabled);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    fn raise_scroll_to(&mut self, offset: Vec2, options: ScrollOptions, raise_completed: bool) -> Result<Reconciled> {
        let relative_change = offset
            - Vec2::new(
                self.horizontal.core.offset_target(),
                self.vertical.core.offset_target(),
            );
        let h = self.horizontal.scroll_to(offset.x, options)?;
        let v = self.vertical.scroll_to(offset.y, options)?;
        let reconciled = reconcile(h, v);
        self.view_changes.borrow_mut().track(
            reconciled,
            ViewChange {
                kind: OperationKind::ScrollTo,
                relative_change,
                raise_completed,
            },
        );
        Ok(reconciled)
    }

    fn raise_add_velocity(
        &mut self,
        velocity: Vec2,
        inertia_decay: Option<Vec2>,
        raise_completed: bool,
    ) -> Result<Reconciled> {
        let mut ids = [None, None];
        for (slot, orientation) in ids.iter_mut().zip(Orientation::ALL) {
            let component = velocity.along(orientation);
            if component == 0.0 {
                continue;
            }
            let decay = inertia_decay.map(|d| d.along(orientation) as f32);
            *slot = self.axis_mut(orientation).add_velocity(component, decay)?;
        }
        let reconciled = reconcile(ids[0], ids[1]);
        self.view_changes.borrow_mut().track(
            reconciled,
            ViewChange {
                kind: OperationKind::AddVelocity,
                relative_change: Vec2::ZERO,
                raise_completed,
            },
        );
        Ok(reconciled)
    }

    /// Scroll both axes to `offset`
    pub fn scroll_to(&mut self, offset: Vec2, animation: AnimationMode) -> Result<Reconciled> {
        debug!(?offset, ?animation, "two-axis scroll-to");
        self.raise_scroll_to(offset, ScrollOptions::new(animation, SnapPointsMode::Default), true)
    }

    /// Scroll both axes by `delta`
    pub fn scroll_by(&mut self, delta: Vec2, animation: AnimationMode) -> Result<Reconciled> {
        debug!(?delta, ?animation, "two-axis scroll-by");
        let options = ScrollOptions::new(animation, SnapPointsMode::Default);
        let h = self.horizontal.scroll_by(delta.x, options)?;
        let v = self.vertical.scroll_by(delta.y, options)?;
        let reconciled = reconcile(h, v);
        self.view_changes.borrow_mut().track(
            reconciled,
            ViewChange {
                kind: OperationKind::ScrollBy,
                relative_change: delta,
                raise_completed: true,
            },
        );
        Ok(reconciled)
    }

    /// Add `velocity` to both axes. Zero components are not raised.
    ///
    /// `inertia_decay` of `None` leaves the decay to the host.
    pub fn add_velocity(&mut self, velocity: Vec2, inertia_decay: Option<Vec2>) -> Result<Reconciled> {
        debug!(?velocity, ?inertia_decay, "two-axis add-velocity");
        self.raise_add_velocity(velocity, inertia_decay, true)
    }

    /// One of the eight repeat buttons
    pub fn velocity_button(&mut self, direction: VelocityDirection) -> Result<Reconciled> {
        if !self.is_enabled() {
            return Ok(Reconciled::Untracked);
        }
        let velocity = direction.signs() * self.config.small_change_velocity;
        let decay = Vec2::splat(self.config.small_change_inertia_decay as f64);
        self.raise_add_velocity(velocity, Some(decay), false)
    }

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    /// A pointer pressed the thumb. Returns true if the press was consumed.
    pub fn on_pointer_pressed(&mut self, pointer: PointerInfo) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match pointer.device {
            PointerDevice::Touch | PointerDevice::Pen => self
                .horizontal
                .core
                .events_mut()
                .raise_interaction_requested(pointer),
            PointerDevice::Mouse => {
                self.drag_origin = Some(self.thumb_position());
                for axis in [&mut self.horizontal, &mut self.vertical] {
                    axis.core.send_interaction(InteractionEvent::Press);
                }
                true
            }
        }
    }

    /// Cumulative drag translation since the press
    pub fn on_drag_delta(&mut self, cumulative: Vec2) -> Result<Reconciled> {
        let Some(origin) = self.drag_origin else {
            return Ok(Reconciled::Untracked);
        };
        if !cumulative.is_finite() {
            return Err(ScrollError::invalid(
                "cumulative",
                cumulative.x + cumulative.y,
                "must be finite",
            ));
        }

        let mut translation = cumulative;
        if self.railing {
            if translation.x.abs() >= translation.y.abs() {
                translation.y = 0.0;
            } else {
                translation.x = 0.0;
            }
        }

        let offset = self.offset_for_thumb_position(origin + translation);
        let reconciled = self.raise_scroll_to(offset, ScrollOptions::immediate(), false)?;
        self.horizontal.core.set_displayed_offset(offset.x);
        self.vertical.core.set_displayed_offset(offset.y);
        Ok(reconciled)
    }

    pub fn on_drag_completed(&mut self) {
        if self.drag_origin.take().is_some() {
            for axis in [&mut self.horizontal, &mut self.vertical] {
                axis.core.send_interaction(InteractionEvent::Release);
            }
        }
    }

    /// A press on the track. Centers the thumb under the pointer.
    pub fn on_track_pressed(&mut self, position: Vec2) -> Result<Reconciled> {
        if !position.is_finite() {
            return Err(ScrollError::invalid(
                "position",
                position.x + position.y,
                "must be finite",
            ));
        }
        if !self.is_enabled() {
            return Ok(Reconciled::Untracked);
        }

        let max = self.max_thumb_position();
        let centered = position - self.thumb_size() * 0.5;
        let thumb_target = Vec2::new(centered.x.clamp(0.0, max.x), centered.y.clamp(0.0, max.y));
        let offset = self.offset_for_thumb_position(thumb_target);
        trace!(?position, ?thumb_target, ?offset, "track pressed");

        let options = ScrollOptions::new(AnimationMode::Auto, SnapPointsMode::Default);
        let reconciled = self.raise_scroll_to(offset, options, false)?;
        if reconciled.is_tracked() {
            debug!(from = ?self.current_offset(), to = ?offset, "track press scroll");
        }
        Ok(reconciled)
    }
}

impl Default for BiDirectionalScrollController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BiDirectionalScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiDirectionalScrollController")
            .field("horizontal", &self.horizontal)
            .field("vertical", &self.vertical)
            .field("pending_view_changes", &self.pending_view_changes())
            .field("railing", &self.railing)
            .field("drag_origin", &self.drag_origin)
            .finish()
    }
}
