//! Glide Animation System
//!
//! Keyframed scroll animations and the scheduler that plays them.
//!
//! # Features
//!
//! - **Scroll Animations**: 2D keyframe sequences with per-segment easing
//! - **Presets**: Accordion overshoot and two-phase teleport curves
//! - **Scheduler**: Frame-driven playback keyed by slotmap handles

pub mod easing;
pub mod error;
pub mod keyframe;
pub mod presets;
pub mod scheduler;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use keyframe::{Keyframe, ScrollAnimation};
pub use presets::{AnimationPreset, AnimationStyle};
pub use scheduler::{AnimationId, AnimationScheduler};
