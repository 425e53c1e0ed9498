//! Controller tuning

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Result, ScrollError};

/// Tunable constants shared by every controller kind
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Thumbs never shrink below this length (unless the track is shorter)
    #[serde(default = "default_min_thumb_length")]
    pub min_thumb_length: f64,
    /// Velocity added by one press of an increment/decrement button
    #[serde(default = "default_small_change_velocity")]
    pub small_change_velocity: f64,
    /// Inertia decay requested along with the small-change velocity
    #[serde(default = "default_small_change_inertia_decay")]
    pub small_change_inertia_decay: f32,
    /// Offset change of a scrollbar's small increment/decrement
    #[serde(default = "default_scrollbar_small_change")]
    pub scrollbar_small_change: f64,
}

fn default_min_thumb_length() -> f64 {
    40.0
}

fn default_small_change_velocity() -> f64 {
    144.0
}

fn default_small_change_inertia_decay() -> f32 {
    0.975
}

fn default_scrollbar_small_change() -> f64 {
    16.0
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_thumb_length: default_min_thumb_length(),
            small_change_velocity: default_small_change_velocity(),
            small_change_inertia_decay: default_small_change_inertia_decay(),
            scrollbar_small_change: default_scrollbar_small_change(),
        }
    }
}

impl ControllerConfig {
    /// Reject values no controller can work with
    pub fn validate(&self) -> Result<()> {
        ensure_finite("min_thumb_length", self.min_thumb_length)?;
        if self.min_thumb_length < 0.0 {
            return Err(ScrollError::invalid(
                "min_thumb_length",
                self.min_thumb_length,
                "must not be negative",
            ));
        }
        ensure_finite("small_change_velocity", self.small_change_velocity)?;
        ensure_finite("scrollbar_small_change", self.scrollbar_small_change)?;

        let decay = self.small_change_inertia_decay;
        if !(0.0..=1.0).contains(&decay) {
            return Err(ScrollError::invalid(
                "small_change_inertia_decay",
                decay as f64,
                "must be within 0.0..=1.0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.min_thumb_length, 40.0);
        assert_eq!(config.small_change_velocity, 144.0);
        assert_eq!(config.small_change_inertia_decay, 0.975);
        assert_eq!(config.scrollbar_small_change, 16.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ControllerConfig = toml::from_str("min_thumb_length = 24.0").unwrap();
        assert_eq!(config.min_thumb_length, 24.0);
        assert_eq!(config.small_change_velocity, 144.0);
    }

    #[test]
    fn test_validate_rejects_bad_decay() {
        let config = ControllerConfig {
            small_change_inertia_decay: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScrollError::InvalidArgument {
                name: "small_change_inertia_decay",
                ..
            })
        ));
    }
}
