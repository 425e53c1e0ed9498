//! Scroll animation presets
//!
//! Custom curves a controller can substitute for the host's default
//! animation. Each preset moves one axis and holds the other axis at the
//! position the scroll had when the animation was requested.

use glide_core::{Orientation, Vec2};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::Result;
use crate::keyframe::ScrollAnimation;

/// Which curve a controller substitutes for the host's default animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    /// Keep the host's animation
    #[default]
    Default,
    /// Overshoot the target and bounce back with shrinking amplitude
    Accordion,
    /// Creep away from the start, jump, then settle onto the target
    Teleportation,
}

/// Number of overshoot keyframes in the accordion curve
const ACCORDION_BOUNCES: i32 = 3;

/// Pre-built scroll animations
pub struct AnimationPreset;

impl AnimationPreset {
    /// Overshoot-and-bounce towards `target`.
    ///
    /// The first overshoot is 10% of the travel distance past the target;
    /// each following bounce halves the amplitude and flips direction.
    pub fn accordion(
        current_position: Vec2,
        orientation: Orientation,
        from_offset: f64,
        target: f64,
        duration_ms: u32,
    ) -> Result<ScrollAnimation> {
        let at = |value: f64| current_position.with_along(orientation, value);

        let mut animation = ScrollAnimation::new(duration_ms);
        animation.insert_keyframe(0.0, current_position, Easing::Linear)?;

        let mut overshoot = 0.1 * (target - from_offset);
        for step in 0..ACCORDION_BOUNCES {
            let time = 1.0 - 0.4 / 2f32.powi(step);
            animation.insert_keyframe(time, at(target + overshoot), Easing::EaseInOut)?;
            overshoot /= -2.0;
        }

        animation.insert_keyframe(1.0, at(target), Easing::EaseInOut)?;
        animation.validate()?;
        Ok(animation)
    }

    /// Two-phase jump towards `target`.
    ///
    /// The first half slowly covers 10% of the distance, the midpoint jumps
    /// to within 10% of the target and the second half settles onto it.
    pub fn teleportation(
        current_position: Vec2,
        orientation: Orientation,
        from_offset: f64,
        target: f64,
        duration_ms: u32,
    ) -> Result<ScrollAnimation> {
        let at = |value: f64| current_position.with_along(orientation, value);
        let delta = target - from_offset;

        let mut animation = ScrollAnimation::new(duration_ms);
        animation.insert_keyframe(0.0, current_position, Easing::Linear)?;
        animation.insert_keyframe(0.499999, at(target - 0.9 * delta), Easing::WIND_UP)?;
        animation.insert_keyframe(0.5, at(target - 0.1 * delta), Easing::Step(1))?;
        animation.insert_keyframe(1.0, at(target), Easing::SETTLE)?;
        animation.validate()?;
        Ok(animation)
    }

    /// Build the curve for `style`, or `None` for [`AnimationStyle::Default`]
    pub fn for_style(
        style: AnimationStyle,
        current_position: Vec2,
        orientation: Orientation,
        from_offset: f64,
        target: f64,
        duration_ms: u32,
    ) -> Result<Option<ScrollAnimation>> {
        let animation = match style {
            AnimationStyle::Default => return Ok(None),
            AnimationStyle::Accordion => {
                Self::accordion(current_position, orientation, from_offset, target, duration_ms)?
            }
            AnimationStyle::Teleportation => {
                Self::teleportation(current_position, orientation, from_offset, target, duration_ms)?
            }
        };
        Ok(Some(animation))
    }
}
