//! Animation error types

use thiserror::Error;

/// Errors raised while building a scroll animation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("keyframe time {0} is outside 0.0..=1.0")]
    KeyframeTimeOutOfRange(f32),

    #[error("keyframe value is not finite")]
    NonFiniteValue,

    #[error("animation has no keyframes")]
    Empty,

    #[error("animation duration must be greater than zero")]
    ZeroDuration,
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
