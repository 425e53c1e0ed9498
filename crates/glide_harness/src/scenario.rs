//! Scenario definition for headless controller runs.

use anyhow::{Context, Result};
use glide_animation::AnimationStyle;
use glide_controllers::{AnimationMode, ScrollEventType, ScrollMode, VelocityDirection};
use glide_core::{Orientation, PointerDevice};
use serde::Deserialize;
use std::path::Path;

/// A controller under test plus the steps driving it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub controller: ControllerSpec,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }
}

fn default_true() -> bool {
    true
}

/// Which controller to build.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerSpec {
    Thumb {
        orientation: Orientation,
        track_length: f64,
        #[serde(default)]
        mirrored: bool,
        #[serde(default = "default_true")]
        pannable: bool,
        #[serde(default)]
        animation_style: AnimationStyle,
        #[serde(default)]
        duration_ms: Option<u32>,
    },
    ScrollBar {
        orientation: Orientation,
    },
    BiDirectional {
        track_width: f64,
        track_height: f64,
        #[serde(default = "default_true")]
        railing: bool,
    },
}

/// One scenario step.
///
/// `x`/`y` address the horizontal and vertical axis. Single-axis controllers
/// read the component along their own orientation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    SetContent {
        orientation: Orientation,
        extent: f64,
        viewport: f64,
    },
    SetEnabled {
        enabled: bool,
    },
    SetScrollMode {
        #[serde(default)]
        orientation: Option<Orientation>,
        mode: ScrollMode,
    },
    ScrollTo {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        animation: AnimationMode,
    },
    ScrollBy {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        animation: AnimationMode,
    },
    PointerPressed {
        #[serde(default)]
        device: PointerDevice,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    /// Cumulative drag distance since the press
    DragDelta {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    DragCompleted,
    TrackPressed {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Increment,
    Decrement,
    ScrollbarEvent {
        event: ScrollEventType,
        #[serde(default)]
        value: f64,
    },
    VelocityButton {
        direction: VelocityDirection,
    },
    Pump {
        frames: u32,
    },
    /// Pump until no request is queued or in flight
    Settle {
        #[serde(default = "default_settle_frames")]
        max_frames: u32,
    },
    AssertOffset {
        orientation: Orientation,
        value: f64,
        #[serde(default)]
        tolerance: f64,
    },
    AssertThumb {
        #[serde(default)]
        orientation: Option<Orientation>,
        #[serde(default)]
        position: Option<f64>,
        #[serde(default)]
        length: Option<f64>,
        #[serde(default)]
        tolerance: f64,
    },
    AssertPending {
        #[serde(default)]
        orientation: Option<Orientation>,
        count: usize,
    },
    AssertInteractionsAllowed {
        #[serde(default)]
        orientation: Option<Orientation>,
        expected: bool,
    },
    /// Completions the surface delivered, plus combined two-axis changes
    AssertCompleted {
        count: usize,
        #[serde(default)]
        view_changes: Option<usize>,
    },
}

fn default_settle_frames() -> u32 {
    600
}

impl ScenarioStep {
    /// Name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::SetContent { .. } => "set_content",
            ScenarioStep::SetEnabled { .. } => "set_enabled",
            ScenarioStep::SetScrollMode { .. } => "set_scroll_mode",
            ScenarioStep::ScrollTo { .. } => "scroll_to",
            ScenarioStep::ScrollBy { .. } => "scroll_by",
            ScenarioStep::PointerPressed { .. } => "pointer_pressed",
            ScenarioStep::DragDelta { .. } => "drag_delta",
            ScenarioStep::DragCompleted => "drag_completed",
            ScenarioStep::TrackPressed { .. } => "track_pressed",
            ScenarioStep::Increment => "increment",
            ScenarioStep::Decrement => "decrement",
            ScenarioStep::ScrollbarEvent { .. } => "scrollbar_event",
            ScenarioStep::VelocityButton { .. } => "velocity_button",
            ScenarioStep::Pump { .. } => "pump",
            ScenarioStep::Settle { .. } => "settle",
            ScenarioStep::AssertOffset { .. } => "assert_offset",
            ScenarioStep::AssertThumb { .. } => "assert_thumb",
            ScenarioStep::AssertPending { .. } => "assert_pending",
            ScenarioStep::AssertInteractionsAllowed { .. } => "assert_interactions_allowed",
            ScenarioStep::AssertCompleted { .. } => "assert_completed",
        }
    }
}
