//! Keyframed scroll animations
//!
//! A [`ScrollAnimation`] moves the scroll position through a sequence of 2D
//! keyframes. The host builds a default one for every animated request and
//! controllers may replace it with their own curve.

use glide_core::Vec2;
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// A single keyframe in a scroll animation
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Time position (0.0 to 1.0)
    pub time: f32,
    /// Scroll position at this keyframe
    pub value: Vec2,
    /// Easing function to use when transitioning TO this keyframe
    pub easing: Easing,
}

impl Keyframe {
    pub fn new(time: f32, value: Vec2, easing: Easing) -> Self {
        Self {
            time,
            value,
            easing,
        }
    }
}

/// A keyframe animation over a 2D scroll position
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollAnimation {
    duration_ms: u32,
    keyframes: SmallVec<[Keyframe; 6]>,
    current_time: f32,
    playing: bool,
}

impl ScrollAnimation {
    /// Create an animation with no keyframes
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            keyframes: SmallVec::new(),
            current_time: 0.0,
            playing: false,
        }
    }

    /// Straight line from `from` to `to`
    pub fn linear(from: Vec2, to: Vec2, duration_ms: u32) -> Self {
        let mut animation = Self::new(duration_ms);
        animation
            .keyframes
            .push(Keyframe::new(0.0, from, Easing::Linear));
        animation.keyframes.push(Keyframe::new(1.0, to, Easing::EaseOut));
        animation
    }

    /// Insert a keyframe, keeping keyframes sorted by time.
    ///
    /// A keyframe at an existing time replaces the old one.
    pub fn insert_keyframe(&mut self, time: f32, value: Vec2, easing: Easing) -> Result<()> {
        if !(0.0..=1.0).contains(&time) {
            return Err(AnimationError::KeyframeTimeOutOfRange(time));
        }
        if !value.is_finite() {
            return Err(AnimationError::NonFiniteValue);
        }

        let keyframe = Keyframe::new(time, value, easing);
        match self
            .keyframes
            .binary_search_by(|kf| kf.time.total_cmp(&time))
        {
            Ok(idx) => self.keyframes[idx] = keyframe,
            Err(idx) => self.keyframes.insert(idx, keyframe),
        }
        Ok(())
    }

    /// Builder form of [`insert_keyframe`](Self::insert_keyframe)
    pub fn with_keyframe(mut self, time: f32, value: Vec2, easing: Easing) -> Result<Self> {
        self.insert_keyframe(time, value, easing)?;
        Ok(self)
    }

    /// Check the animation can be played
    pub fn validate(&self) -> Result<()> {
        if self.keyframes.is_empty() {
            return Err(AnimationError::Empty);
        }
        if self.duration_ms == 0 {
            return Err(AnimationError::ZeroDuration);
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
    }

    /// Builder: replace the duration
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True once playback has reached the end
    pub fn is_finished(&self) -> bool {
        !self.playing && self.current_time >= self.duration_ms as f32
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.current_time / self.duration_ms as f32
    }

    /// Position at the end of the animation
    pub fn final_value(&self) -> Option<Vec2> {
        self.keyframes.last().map(|kf| kf.value)
    }

    /// Get the current interpolated position
    pub fn value(&self) -> Vec2 {
        self.value_at(self.progress())
    }

    /// Interpolated position at `progress` (clamped to 0.0..=1.0)
    pub fn value_at(&self, progress: f32) -> Vec2 {
        let Some(first) = self.keyframes.first() else {
            return Vec2::ZERO;
        };

        let progress = progress.clamp(0.0, 1.0);

        let mut prev_kf = first;
        let mut next_kf = first;

        for kf in &self.keyframes {
            if kf.time <= progress {
                prev_kf = kf;
            }
            if kf.time >= progress {
                next_kf = kf;
                break;
            }
        }

        if (prev_kf.time - next_kf.time).abs() < f32::EPSILON {
            return prev_kf.value;
        }

        let local_progress = (progress - prev_kf.time) / (next_kf.time - prev_kf.time);
        let eased = next_kf.easing.apply(local_progress);

        prev_kf.value.lerp(next_kf.value, eased as f64)
    }

    /// Advance the animation by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }

        self.current_time += dt_ms;

        if self.current_time >= self.duration_ms as f32 {
            self.current_time = self.duration_ms as f32;
            self.playing = false;
        }
    }

    /// Get the keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }
}
