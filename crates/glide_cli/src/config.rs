//! Glide configuration file handling

use anyhow::{Context, Result};
use glide_controllers::ControllerConfig;
use glide_harness::{HarnessConfig, SurfaceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "glide.toml";

/// Top-level Glide configuration (glide.toml)
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GlideConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl GlideConfig {
    /// Load configuration from a file, or from glide.toml inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No config found at {}. Run `glide config` to print a default one.",
                config_path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load `glide.toml` from `dir` if present, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        if dir.join(CONFIG_FILE).exists() {
            Self::load(dir)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GlideConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.controller.validate()?;
        self.surface.validate()
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn harness(&self) -> HarnessConfig {
        HarnessConfig {
            controller: self.controller.clone(),
            surface: self.surface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = GlideConfig::from_toml(
            r#"
            [controller]
            min_thumb_length = 24.0

            [surface]
            frame_ms = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.controller.min_thumb_length, 24.0);
        assert_eq!(config.controller.small_change_velocity, 144.0);
        assert_eq!(config.surface.frame_ms, 8);
        assert_eq!(config.surface.default_animation_ms, 300);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(GlideConfig::from_toml("[surface]\nframe_ms = 0\n").is_err());
        assert!(GlideConfig::from_toml("[controller]\nsmall_change_inertia_decay = 2.0\n").is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = GlideConfig::default().to_toml().unwrap();
        assert_eq!(GlideConfig::from_toml(&text).unwrap(), GlideConfig::default());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = GlideConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
