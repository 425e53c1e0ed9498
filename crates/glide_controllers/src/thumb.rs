//! Single-axis thumb controller
//!
//! A draggable thumb inside a track, with repeat buttons on either side.
//! Mouse presses on the thumb start a drag driven by the controller itself;
//! touch and pen presses are handed to the host as interaction requests.
//! Presses on the track outside the thumb page by one viewport.

use glide_animation::{AnimationPreset, AnimationStyle, ScrollAnimation};
use glide_core::{DeferredQueue, Orientation, PointerDevice, PointerInfo, Priority, Vec2};
use tracing::{debug, trace, warn};

use crate::config::ControllerConfig;
use crate::controller::{AnimationMode, ControllerCore, ScrollController, ScrollOptions, SnapPointsMode};
use crate::correlation::CorrelationId;
use crate::error::{ensure_finite, Result, ScrollError};
use crate::interaction::InteractionEvent;
use crate::mapping::{ThumbGeometry, ThumbTrack};

/// Work a thumb controller postpones until after the host's layout pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeferredTask {
    UpdateMultiplier,
}

/// Which part of the track a press landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackHit {
    BeforeThumb,
    Thumb,
    AfterThumb,
}

/// Thumb-and-track controller for one axis
#[derive(Debug)]
pub struct ThumbScrollController {
    core: ControllerCore,
    config: ControllerConfig,
    track: ThumbTrack,
    pannable: bool,
    /// Thumb position when the current mouse drag started
    drag_origin: Option<f64>,
    animation_style: AnimationStyle,
    overridden_duration_ms: Option<u32>,
    stock_duration_ms: Option<u32>,
    deferred: DeferredQueue<DeferredTask>,
}

impl ThumbScrollController {
    pub fn new(orientation: Orientation) -> Self {
        Self::build(orientation, ControllerConfig::default())
    }

    pub fn with_config(orientation: Orientation, config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(orientation, config))
    }

    fn build(orientation: Orientation, config: ControllerConfig) -> Self {
        let mut controller = Self {
            core: ControllerCore::new(orientation),
            track: ThumbTrack::new(config.min_thumb_length),
            config,
            pannable: true,
            drag_origin: None,
            animation_style: AnimationStyle::Default,
            overridden_duration_ms: None,
            stock_duration_ms: None,
            deferred: DeferredQueue::new(),
        };
        controller.update_thumb_length();
        controller.update_element_available();
        controller
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    pub fn track_length(&self) -> f64 {
        self.track.track_length()
    }

    /// Resize the track. Thumb length and multiplier follow immediately.
    pub fn set_track_length(&mut self, track_length: f64) -> Result<()> {
        ensure_finite("track_length", track_length)?;
        if track_length < 0.0 {
            return Err(ScrollError::invalid(
                "track_length",
                track_length,
                "must not be negative",
            ));
        }
        self.track.set_track_length(track_length);
        self.update_thumb_length();
        self.update_multiplier();
        Ok(())
    }

    pub fn thumb_length(&self) -> f64 {
        self.track.thumb_length()
    }

    /// Thumb position for the displayed offset
    pub fn thumb_position(&self) -> f64 {
        self.track
            .position(self.core.displayed_offset(), self.core.dimensions())
    }

    pub fn thumb_geometry(&self) -> ThumbGeometry {
        self.track
            .geometry(self.core.displayed_offset(), self.core.dimensions())
    }

    /// Offset units per thumb unit, as last computed
    pub fn offset_multiplier(&self) -> f64 {
        self.track.multiplier()
    }

    pub fn is_mirrored(&self) -> bool {
        self.track.is_mirrored()
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.track.is_mirrored() != mirrored {
            self.track.set_mirrored(mirrored);
            self.update_multiplier();
        }
    }

    /// Offset that puts the thumb at `position`
    pub fn offset_for_thumb_position(&self, position: f64) -> f64 {
        self.track.offset_at(position, self.core.dimensions())
    }

    /// Returns true if the thumb length changed
    fn update_thumb_length(&mut self) -> bool {
        let changed = self.track.update_thumb_length(self.core.dimensions());
        if changed {
            trace!(
                orientation = %self.core.orientation(),
                length = self.track.thumb_length(),
                "thumb length updated"
            );
        }
        changed
    }

    fn update_multiplier(&mut self) {
        let multiplier = self.track.update_multiplier(self.core.dimensions());
        trace!(orientation = %self.core.orientation(), multiplier, "multiplier updated");
    }

    // ------------------------------------------------------------------------
    // Interaction element
    // ------------------------------------------------------------------------

    pub fn is_pannable(&self) -> bool {
        self.pannable
    }

    /// Whether touch and pen presses on the thumb are handed to the host
    pub fn set_pannable(&mut self, pannable: bool) {
        if self.pannable == pannable {
            return;
        }
        self.pannable = pannable;
        self.update_element_available();
        self.core.raise_interaction_info_changed();
    }

    pub fn interaction_element_available(&self) -> bool {
        self.pannable && self.core.is_enabled()
    }

    fn update_element_available(&mut self) -> bool {
        let available = self.interaction_element_available();
        self.core.set_element_available(available)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// A pointer pressed the thumb. Returns true if the press was consumed.
    pub fn on_pointer_pressed(&mut self, pointer: PointerInfo) -> bool {
        debug!(orientation = %self.core.orientation(), ?pointer, "thumb pressed");
        match pointer.device {
            PointerDevice::Touch | PointerDevice::Pen => {
                if !self.pannable || !self.core.is_enabled() {
                    return false;
                }
                self.core.events_mut().raise_interaction_requested(pointer)
            }
            PointerDevice::Mouse => {
                if !self.core.is_enabled() {
                    return false;
                }
                self.drag_origin = Some(self.thumb_position());
                self.core.send_interaction(InteractionEvent::Press);
                true
            }
        }
    }

    /// Cumulative drag translation along the axis since the press.
    ///
    /// Raises an immediate scroll-to for the offset under the dragged thumb.
    pub fn on_drag_delta(&mut self, cumulative: f64) -> Result<Option<CorrelationId>> {
        let Some(origin) = self.drag_origin else {
            return Ok(None);
        };
        ensure_finite("cumulative", cumulative)?;

        let offset = self.offset_for_thumb_position(origin + cumulative);
        let relative_change = offset - self.core.offset_target();
        let id = self
            .core
            .request_scroll_to(offset, ScrollOptions::immediate(), relative_change)?;
        self.core.set_displayed_offset(offset);
        self.core.set_offset_target(offset);
        Ok(id)
    }

    pub fn on_drag_completed(&mut self) {
        if self.drag_origin.take().is_some() {
            self.core.send_interaction(InteractionEvent::Release);
        }
    }

    /// Classify a press at `position` along the track
    pub fn hit_test(&self, position: f64) -> TrackHit {
        let thumb_start = self.thumb_position();
        if position < thumb_start {
            TrackHit::BeforeThumb
        } else if position > thumb_start + self.track.thumb_length() {
            TrackHit::AfterThumb
        } else {
            TrackHit::Thumb
        }
    }

    /// A press on the track at `position`. Pages one viewport towards it.
    ///
    /// Presses on the thumb itself raise nothing.
    pub fn on_track_pressed(&mut self, position: f64) -> Result<Option<CorrelationId>> {
        ensure_finite("position", position)?;
        if !self.core.is_enabled() {
            return Ok(None);
        }

        let viewport = self.core.dimensions().viewport();
        let towards_start = match self.hit_test(position) {
            TrackHit::Thumb => return Ok(None),
            TrackHit::BeforeThumb => true,
            TrackHit::AfterThumb => false,
        };
        let change = if towards_start != self.is_mirrored() {
            -viewport
        } else {
            viewport
        };

        let previous_target = self.core.offset_target();
        self.core.set_offset_target(previous_target + change);
        let target = self.core.offset_target();
        let relative_change = target - previous_target;

        self.core.request_scroll_to(
            target,
            ScrollOptions::new(AnimationMode::Auto, SnapPointsMode::Default),
            relative_change,
        )
    }

    /// Repeat button towards `max_offset` (`min_offset` when mirrored)
    pub fn increment(&mut self) -> Result<Option<CorrelationId>> {
        let velocity = self.config.small_change_velocity;
        self.small_change(if self.is_mirrored() { -velocity } else { velocity })
    }

    /// Repeat button towards `min_offset` (`max_offset` when mirrored)
    pub fn decrement(&mut self) -> Result<Option<CorrelationId>> {
        let velocity = self.config.small_change_velocity;
        self.small_change(if self.is_mirrored() { velocity } else { -velocity })
    }

    fn small_change(&mut self, velocity: f64) -> Result<Option<CorrelationId>> {
        if !self.core.is_enabled() {
            return Ok(None);
        }
        let decay = self.config.small_change_inertia_decay;
        self.core.request_add_velocity(velocity, Some(decay))
    }

    // ------------------------------------------------------------------------
    // Animation override
    // ------------------------------------------------------------------------

    pub fn animation_style(&self) -> AnimationStyle {
        self.animation_style
    }

    pub fn set_animation_style(&mut self, style: AnimationStyle) {
        self.animation_style = style;
    }

    pub fn overridden_duration_ms(&self) -> Option<u32> {
        self.overridden_duration_ms
    }

    /// Replace the host's animation duration. `None` keeps the host's.
    pub fn set_overridden_duration_ms(&mut self, duration_ms: Option<u32>) {
        self.overridden_duration_ms = duration_ms;
    }

    /// Duration the host proposed for the last overridden animation
    pub fn stock_duration_ms(&self) -> Option<u32> {
        self.stock_duration_ms
    }

    fn build_animation(
        &mut self,
        id: CorrelationId,
        current_position: Vec2,
        default: &ScrollAnimation,
    ) -> Result<Option<ScrollAnimation>> {
        let custom = if self.animation_style == AnimationStyle::Default {
            None
        } else {
            let operation = self
                .core
                .pending()
                .get(id)
                .ok_or(ScrollError::UnknownOperation(id))?;
            AnimationPreset::for_style(
                self.animation_style,
                current_position,
                self.core.orientation(),
                self.core.dimensions().offset(),
                operation.offset_target,
                default.duration_ms(),
            )?
        };

        let Some(duration_ms) = self.overridden_duration_ms else {
            return Ok(custom);
        };
        self.stock_duration_ms = Some(default.duration_ms());
        let animation = custom.unwrap_or_else(|| default.clone());
        Ok(Some(animation.with_duration_ms(duration_ms)))
    }
}

impl ScrollController for ThumbScrollController {
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
            if self.update_thumb_length() {
                // The thumb is resized by the host's layout pass; the
                // multiplier must see the new size
                self.deferred
                    .post(DeferredTask::UpdateMultiplier, Priority::Low);
            } else {
                self.update_multiplier();
            }
        }
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.core.is_enabled() == enabled {
            return;
        }
        if !enabled {
            self.on_drag_completed();
        }
        self.core.set_enabled(enabled);
        if self.update_element_available() {
            self.core.raise_interaction_info_changed();
        }
    }

    fn scroll_animation(
        &mut self,
        id: CorrelationId,
        current_position: Vec2,
        default: ScrollAnimation,
    ) -> ScrollAnimation {
        match self.build_animation(id, current_position, &default) {
            Ok(Some(animation)) => {
                debug!(
                    orientation = %self.core.orientation(),
                    id = %id,
                    style = ?self.animation_style,
                    duration_ms = animation.duration_ms(),
                    "scroll animation overridden"
                );
                animation
            }
            Ok(None) => default,
            Err(err) => {
                warn!(id = %id, error = %err, "custom scroll animation failed, using default");
                default
            }
        }
    }

    fn process_deferred(&mut self) {
        for task in self.deferred.drain() {
            match task {
                DeferredTask::UpdateMultiplier => self.update_multiplier(),
            }
        }
    }

    fn has_deferred_work(&self) -> bool {
        !self.deferred.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::correlation::OperationKind;

    fn id(raw: i32) -> CorrelationId {
        CorrelationId::from_raw(raw).unwrap()
    }

    fn controller() -> ThumbScrollController {
        let mut c = ThumbScrollController::new(Orientation::Vertical);
        c.set_track_length(300.0).unwrap();
        c.set_dimensions(50.0, 0.0, 200.0, 100.0).unwrap();
        c.process_deferred();
        c
    }

    /// Answers every scroll-to with increasing ids and records the offsets
    fn listen_scroll_to(c: &mut ThumbScrollController) -> Rc<RefCell<Vec<(f64, AnimationMode)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut next = 0;
        c.events_mut().scroll_to_requested.subscribe(move |req| {
            next += 1;
            sink.borrow_mut().push((req.offset, req.options.animation));
            req.correlation_id = CorrelationId::from_raw(next);
        });
        seen
    }

    #[test]
    fn test_geometry_follows_dimensions() {
        let c = controller();
        assert_eq!(c.thumb_length(), 100.0);
        assert_eq!(c.thumb_position(), 50.0);
        assert_eq!(c.offset_multiplier(), -1.0);
    }

    #[test]
    fn test_thumb_resize_defers_multiplier() {
        let mut c = controller();
        c.set_dimensions(0.0, 0.0, 500.0, 100.0).unwrap();
        assert!(c.has_deferred_work());
        assert_eq!(c.offset_multiplier(), -1.0);

        c.process_deferred();
        assert!(!c.has_deferred_work());
        assert_eq!(c.thumb_length(), 50.0);
        assert_eq!(c.offset_multiplier(), -2.0);
    }

    #[test]
    fn test_track_press_pages_by_viewport() {
        let mut c = controller();
        let seen = listen_scroll_to(&mut c);

        // Thumb spans 50..150
        assert_eq!(c.on_track_pressed(250.0).unwrap(), Some(id(1)));
        assert_eq!(seen.borrow()[0], (150.0, AnimationMode::Auto));

        let op = c.pending_operations().get(id(1)).copied().unwrap();
        assert_eq!(op.relative_change, 100.0);
        assert_eq!(op.offset_target, 150.0);

        // Second press builds on the pending target and clamps
        c.on_track_pressed(250.0).unwrap();
        assert_eq!(seen.borrow()[1].0, 200.0);
        assert_eq!(c.pending_operations().get(id(2)).unwrap().relative_change, 50.0);
    }

    #[test]
    fn test_track_press_on_thumb_is_ignored() {
        let mut c = controller();
        let seen = listen_scroll_to(&mut c);
        assert_eq!(c.on_track_pressed(100.0).unwrap(), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_mirrored_track_press_flips_direction() {
        let mut c = controller();
        c.set_mirrored(true);
        let seen = listen_scroll_to(&mut c);
        // Mirrored: offset 50 puts the thumb at 150..250
        assert_eq!(c.thumb_position(), 150.0);
        c.on_track_pressed(10.0).unwrap();
        assert_eq!(seen.borrow()[0].0, 150.0);
    }

    #[test]
    fn test_mouse_drag_raises_immediate_scroll_to() {
        let mut c = controller();
        let seen = listen_scroll_to(&mut c);

        assert!(c.on_pointer_pressed(PointerInfo::new(PointerDevice::Mouse, Vec2::ZERO)));
        assert!(c.is_dragging());
        assert!(!c.are_interactions_allowed());

        c.on_drag_delta(25.0).unwrap();
        assert_eq!(seen.borrow()[0], (75.0, AnimationMode::Disabled));
        assert_eq!(c.thumb_position(), 75.0);

        c.on_drag_completed();
        assert!(!c.is_dragging());
        assert!(c.are_interactions_allowed());
    }

    #[test]
    fn test_touch_press_requests_interaction() {
        let mut c = controller();
        c.events_mut()
            .interaction_requested
            .subscribe(|req| req.handled = true);

        assert!(c.on_pointer_pressed(PointerInfo::new(PointerDevice::Touch, Vec2::ZERO)));
        assert!(!c.is_dragging());

        c.set_pannable(false);
        assert!(!c.on_pointer_pressed(PointerInfo::new(PointerDevice::Pen, Vec2::ZERO)));
    }

    #[test]
    fn test_repeat_buttons_add_velocity() {
        let mut c = controller();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        c.events_mut().add_velocity_requested.subscribe(move |req| {
            sink.borrow_mut().push((req.velocity, req.inertia_decay));
            req.correlation_id = CorrelationId::from_raw(3);
        });

        assert_eq!(c.increment().unwrap(), Some(id(3)));
        c.decrement().unwrap();
        c.set_mirrored(true);
        c.increment().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[0], (144.0, Some(0.975)));
        assert_eq!(seen[1].0, -144.0);
        assert_eq!(seen[2].0, -144.0);
        assert_eq!(c.pending_operations().count_of(OperationKind::AddVelocity), 1);
    }

    #[test]
    fn test_pannable_change_raises_info() {
        let mut c = controller();
        let infos = Rc::new(RefCell::new(Vec::new()));
        let sink = infos.clone();
        c.events_mut()
            .interaction_info_changed
            .subscribe(move |info| sink.borrow_mut().push(*info));

        c.set_pannable(false);
        c.set_pannable(false);
        assert_eq!(infos.borrow().len(), 1);
        assert!(!infos.borrow()[0].interaction_element_available);
    }

    #[test]
    fn test_accordion_override() {
        let mut c = controller();
        listen_scroll_to(&mut c);
        c.set_animation_style(AnimationStyle::Accordion);
        c.on_track_pressed(250.0).unwrap();

        let default = ScrollAnimation::linear(Vec2::new(0.0, 50.0), Vec2::new(0.0, 150.0), 250);
        let anim = c.scroll_animation(id(1), Vec2::new(7.0, 50.0), default);
        assert_eq!(anim.keyframes().len(), 5);
        assert_eq!(anim.duration_ms(), 250);
        assert_eq!(anim.final_value(), Some(Vec2::new(7.0, 150.0)));
    }

    #[test]
    fn test_override_for_unknown_id_falls_back() {
        let mut c = controller();
        c.set_animation_style(AnimationStyle::Teleportation);
        let default = ScrollAnimation::linear(Vec2::ZERO, Vec2::new(0.0, 10.0), 200);
        let anim = c.scroll_animation(id(99), Vec2::ZERO, default.clone());
        assert_eq!(anim, default);
    }

    #[test]
    fn test_overridden_duration_keeps_stock() {
        let mut c = controller();
        c.set_overridden_duration_ms(Some(900));
        let default = ScrollAnimation::linear(Vec2::ZERO, Vec2::new(0.0, 10.0), 200);
        let anim = c.scroll_animation(id(1), Vec2::ZERO, default);
        assert_eq!(anim.duration_ms(), 900);
        assert_eq!(c.stock_duration_ms(), Some(200));
    }

    #[test]
    fn test_disable_cancels_drag() {
        let mut c = controller();
        c.on_pointer_pressed(PointerInfo::new(PointerDevice::Mouse, Vec2::ZERO));

        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        c.events_mut()
            .interaction_info_changed
            .subscribe(move |_| *sink.borrow_mut() += 1);

        c.set_enabled(false);
        assert!(!c.is_dragging());
        assert!(!c.interaction_element_available());
        assert!(!c.are_interactions_allowed());
        // Drag release, enabled change, element availability
        assert_eq!(*count.borrow(), 3);
    }
}
