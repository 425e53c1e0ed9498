//! Scroll controller error types

use glide_animation::AnimationError;
use thiserror::Error;

use crate::correlation::CorrelationId;

/// Errors raised by scroll controllers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrollError {
    /// A setter received a value outside its domain. The call had no effect.
    #[error("invalid argument `{name}` = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("no pending operation with correlation id {0}")]
    UnknownOperation(CorrelationId),

    #[error("failed to build scroll animation: {0}")]
    Animation(#[from] AnimationError),
}

impl ScrollError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ScrollError::InvalidArgument {
            name,
            value,
            reason,
        }
    }
}

/// Result type for scroll controller operations
pub type Result<T> = std::result::Result<T, ScrollError>;

/// Fail with [`ScrollError::InvalidArgument`] unless `value` is finite
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScrollError::invalid(name, value, "must be finite"))
    }
}
