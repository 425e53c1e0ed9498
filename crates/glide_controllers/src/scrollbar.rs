//! Scrollbar-backed controller
//!
//! Adapts a conventional range scrollbar (value, small and large change,
//! draggable thumb) to the controller contract. Every scrollbar event
//! becomes an immediate scroll-to; the host never animates them.

use glide_core::{EventSource, Orientation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ControllerConfig;
use crate::controller::{ControllerCore, ScrollController, ScrollOptions};
use crate::correlation::CorrelationId;
use crate::error::{ensure_finite, Result};
use crate::interaction::InteractionEvent;

/// Kinds of scroll event a scrollbar reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollEventType {
    SmallDecrement,
    SmallIncrement,
    LargeDecrement,
    LargeIncrement,
    /// Thumb released at a new position
    ThumbPosition,
    /// Thumb is being dragged
    ThumbTrack,
    /// The user finished a scroll gesture
    EndScroll,
}

#[derive(Debug)]
pub struct ScrollBarController {
    core: ControllerCore,
    small_change: f64,
    scrolling_with_mouse: bool,
    can_scroll: bool,
    /// Raised with the new value of [`is_scrolling_with_mouse`](Self::is_scrolling_with_mouse)
    pub is_scrolling_with_mouse_changed: EventSource<bool>,
    /// Raised with the new value of [`can_scroll`](Self::can_scroll)
    pub can_scroll_changed: EventSource<bool>,
}

impl ScrollBarController {
    pub fn new(orientation: Orientation) -> Self {
        Self::with_config(orientation, &ControllerConfig::default())
    }

    pub fn with_config(orientation: Orientation, config: &ControllerConfig) -> Self {
        Self {
            core: ControllerCore::new(orientation),
            small_change: config.scrollbar_small_change,
            scrolling_with_mouse: false,
            can_scroll: false,
            is_scrolling_with_mouse_changed: EventSource::new(),
            can_scroll_changed: EventSource::new(),
        }
    }

    /// Current scrollbar value. Frozen while operations are pending.
    pub fn value(&self) -> f64 {
        self.core.displayed_offset()
    }

    pub fn minimum(&self) -> f64 {
        self.core.dimensions().min_offset()
    }

    pub fn maximum(&self) -> f64 {
        self.core.dimensions().max_offset()
    }

    pub fn viewport_size(&self) -> f64 {
        self.core.dimensions().viewport()
    }

    pub fn small_change(&self) -> f64 {
        self.small_change
    }

    /// One viewport
    pub fn large_change(&self) -> f64 {
        self.core.dimensions().viewport()
    }

    pub fn is_scrolling_with_mouse(&self) -> bool {
        self.scrolling_with_mouse
    }

    /// True when there is something to scroll and the scrollbar is enabled
    pub fn can_scroll(&self) -> bool {
        self.can_scroll
    }

    fn set_scrolling_with_mouse(&mut self, scrolling: bool) {
        if self.scrolling_with_mouse == scrolling {
            return;
        }
        self.scrolling_with_mouse = scrolling;
        self.core.send_interaction(if scrolling {
            InteractionEvent::Press
        } else {
            InteractionEvent::Release
        });
        let mut value = scrolling;
        self.is_scrolling_with_mouse_changed.emit(&mut value);
    }

    fn refresh_can_scroll(&mut self) {
        let can_scroll = self.core.dimensions().is_scrollable() && self.core.is_enabled();
        if can_scroll != self.can_scroll {
            self.can_scroll = can_scroll;
            let mut value = can_scroll;
            self.can_scroll_changed.emit(&mut value);
        }
    }

    /// Handle a scroll event carrying the scrollbar's proposed `new_value`
    pub fn on_scroll(
        &mut self,
        event_type: ScrollEventType,
        new_value: f64,
    ) -> Result<Option<CorrelationId>> {
        ensure_finite("new_value", new_value)?;
        debug!(
            orientation = %self.core.orientation(),
            ?event_type,
            new_value,
            "scrollbar scroll"
        );

        match event_type {
            ScrollEventType::EndScroll => {
                self.set_scrolling_with_mouse(false);
                Ok(None)
            }
            _ if !self.core.is_enabled() => Ok(None),
            _ => {
                if event_type == ScrollEventType::ThumbTrack {
                    self.set_scrolling_with_mouse(true);
                }
                let relative_change = new_value - self.core.offset_target();
                let id = self.core.request_scroll_to(
                    new_value,
                    ScrollOptions::immediate(),
                    relative_change,
                )?;
                if id.is_some() {
                    self.core.set_offset_target(new_value);
                }
                Ok(id)
            }
        }
    }

    fn step(&mut self, event_type: ScrollEventType, change: f64) -> Result<Option<CorrelationId>> {
        let new_value = self.core.dimensions().clamp(self.core.offset_target() + change);
        self.on_scroll(event_type, new_value)
    }

    pub fn small_increment(&mut self) -> Result<Option<CorrelationId>> {
        self.step(ScrollEventType::SmallIncrement, self.small_change)
    }

    pub fn small_decrement(&mut self) -> Result<Option<CorrelationId>> {
        self.step(ScrollEventType::SmallDecrement, -self.small_change)
    }

    pub fn large_increment(&mut self) -> Result<Option<CorrelationId>> {
        self.step(ScrollEventType::LargeIncrement, self.large_change())
    }

    pub fn large_decrement(&mut self) -> Result<Option<CorrelationId>> {
        self.step(ScrollEventType::LargeDecrement, -self.large_change())
    }
}

impl ScrollController for ScrollBarController {
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
        self.core
            .apply_dimensions(offset, min_offset, max_offset, viewport)?;
        self.refresh_can_scroll();
        Ok(())
    }

    /// Disabling also resets the displayed value to the minimum
    fn set_enabled(&mut self, enabled: bool) {
        if self.core.is_enabled() == enabled {
            return;
        }
        if !enabled {
            self.set_scrolling_with_mouse(false);
            let min = self.core.dimensions().min_offset();
            self.core.set_displayed_offset(min);
        }
        self.core.set_enabled(enabled);
        self.refresh_can_scroll();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::controller::AnimationMode;

    fn scrollbar() -> (ScrollBarController, Rc<RefCell<Vec<f64>>>) {
        let mut bar = ScrollBarController::new(Orientation::Horizontal);
        bar.set_dimensions(100.0, 0.0, 1000.0, 250.0).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut next = 10;
        bar.events_mut().scroll_to_requested.subscribe(move |req| {
            assert_eq!(req.options.animation, AnimationMode::Disabled);
            sink.borrow_mut().push(req.offset);
            next += 1;
            req.correlation_id = CorrelationId::from_raw(next);
        });
        (bar, seen)
    }

    #[test]
    fn test_changes() {
        let (bar, _) = scrollbar();
        assert_eq!(bar.small_change(), 16.0);
        assert_eq!(bar.large_change(), 250.0);
        assert!(bar.can_scroll());
    }

    #[test]
    fn test_small_and_large_steps() {
        let (mut bar, seen) = scrollbar();
        bar.small_increment().unwrap();
        bar.large_decrement().unwrap();
        assert_eq!(*seen.borrow(), vec![116.0, 0.0]);
    }

    #[test]
    fn test_steps_accumulate_while_pending() {
        let (mut bar, seen) = scrollbar();
        bar.small_increment().unwrap();
        bar.small_increment().unwrap();
        bar.small_increment().unwrap();

        assert_eq!(*seen.borrow(), vec![116.0, 132.0, 148.0]);
        assert_eq!(bar.value(), 100.0);
        assert_eq!(bar.pending_operations().len(), 3);
    }

    #[test]
    fn test_large_steps_clamp_to_range() {
        let (mut bar, seen) = scrollbar();
        for _ in 0..5 {
            bar.large_increment().unwrap();
        }
        assert_eq!(*seen.borrow(), vec![350.0, 600.0, 850.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_value_frozen_until_completion() {
        let (mut bar, _) = scrollbar();
        let id = bar.on_scroll(ScrollEventType::ThumbPosition, 400.0).unwrap().unwrap();

        bar.set_dimensions(400.0, 0.0, 1000.0, 250.0).unwrap();
        assert_eq!(bar.value(), 100.0);

        bar.notify_completed(id);
        assert_eq!(bar.value(), 400.0);
    }

    #[test]
    fn test_thumb_track_sets_mouse_scrolling() {
        let (mut bar, _) = scrollbar();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let sink = flags.clone();
        bar.is_scrolling_with_mouse_changed
            .subscribe(move |v| sink.borrow_mut().push(*v));

        bar.on_scroll(ScrollEventType::ThumbTrack, 300.0).unwrap();
        bar.on_scroll(ScrollEventType::ThumbTrack, 320.0).unwrap();
        assert!(bar.is_scrolling_with_mouse());
        assert!(!bar.are_interactions_allowed());

        assert_eq!(bar.on_scroll(ScrollEventType::EndScroll, 320.0).unwrap(), None);
        assert!(!bar.is_scrolling_with_mouse());
        assert!(bar.are_interactions_allowed());
        assert_eq!(*flags.borrow(), vec![true, false]);
    }

    #[test]
    fn test_disable_resets_value() {
        let (mut bar, seen) = scrollbar();
        bar.set_enabled(false);
        assert_eq!(bar.value(), 0.0);
        assert!(!bar.can_scroll());
        assert_eq!(bar.small_increment().unwrap(), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unscrollable_content() {
        let mut bar = ScrollBarController::new(Orientation::Vertical);
        bar.set_dimensions(0.0, 0.0, 0.0, 500.0).unwrap();
        assert!(!bar.can_scroll());
    }
}
