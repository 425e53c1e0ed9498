//! Animation scheduler
//!
//! Plays every active scroll animation and advances them together each
//! frame. Time is supplied by the caller so playback is deterministic.

use glide_core::Vec2;
use slotmap::{new_key_type, SlotMap};

use crate::keyframe::ScrollAnimation;

new_key_type! {
    pub struct AnimationId;
}

/// The animation scheduler that ticks all active animations
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, ScrollAnimation>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
        }
    }

    /// Start playing `animation` from its beginning
    pub fn play(&mut self, mut animation: ScrollAnimation) -> AnimationId {
        animation.start();
        let id = self.animations.insert(animation);
        tracing::trace!(?id, "animation started");
        id
    }

    pub fn get(&self, id: AnimationId) -> Option<&ScrollAnimation> {
        self.animations.get(id)
    }

    /// Current position of an animation
    pub fn value(&self, id: AnimationId) -> Option<Vec2> {
        self.animations.get(id).map(ScrollAnimation::value)
    }

    pub fn is_finished(&self, id: AnimationId) -> bool {
        self.animations
            .get(id)
            .map_or(true, ScrollAnimation::is_finished)
    }

    pub fn remove(&mut self, id: AnimationId) -> Option<ScrollAnimation> {
        self.animations.remove(id)
    }

    /// Tick all animations by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        for (_, animation) in self.animations.iter_mut() {
            animation.tick(dt_ms);
        }
    }

    /// Remove and return every animation that has reached its end
    pub fn take_finished(&mut self) -> Vec<(AnimationId, ScrollAnimation)> {
        let finished: Vec<AnimationId> = self
            .animations
            .iter()
            .filter(|(_, a)| a.is_finished())
            .map(|(id, _)| id)
            .collect();

        finished
            .into_iter()
            .filter_map(|id| self.animations.remove(id).map(|a| (id, a)))
            .collect()
    }

    /// Check if any animations are still playing
    pub fn has_active_animations(&self) -> bool {
        self.animations.iter().any(|(_, a)| a.is_playing())
    }

    /// Get the number of animations in the scheduler
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_and_collect() {
        let mut scheduler = AnimationScheduler::new();
        let short = scheduler.play(ScrollAnimation::linear(
            Vec2::ZERO,
            Vec2::new(0.0, 50.0),
            100,
        ));
        let long = scheduler.play(ScrollAnimation::linear(
            Vec2::ZERO,
            Vec2::new(0.0, 50.0),
            300,
        ));
        assert!(scheduler.has_active_animations());

        scheduler.tick(100.0);
        assert!(scheduler.is_finished(short));
        assert!(!scheduler.is_finished(long));

        let done = scheduler.take_finished();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, short);
        assert_eq!(done[0].1.value(), Vec2::new(0.0, 50.0));

        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.value(short).is_none());
    }

    #[test]
    fn test_removed_counts_as_finished() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.play(ScrollAnimation::linear(Vec2::ZERO, Vec2::splat(1.0), 50));
        scheduler.remove(id);
        assert!(scheduler.is_finished(id));
        assert!(!scheduler.has_active_animations());
    }
}
