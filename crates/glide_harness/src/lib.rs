//! Glide Headless Harness
//!
//! Runs scroll controllers against a simulated host surface without any
//! windowing or rendering. Scenarios are JSON step lists; each run yields a
//! machine-readable report.
//!
//! # Example
//!
//! ```rust
//! use glide_harness::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "controller": { "kind": "thumb", "orientation": "vertical", "track_length": 300 },
//!     "steps": [
//!         { "type": "set_content", "orientation": "vertical", "extent": 300, "viewport": 100 },
//!         { "type": "track_pressed", "y": 250 },
//!         { "type": "settle" },
//!         { "type": "assert_offset", "orientation": "vertical", "value": 100 }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod report;
pub mod rig;
pub mod runner;
pub mod scenario;
pub mod surface;

pub use assert::AssertionResult;
pub use report::{HeadlessReport, ReportStatus};
pub use rig::Rig;
pub use runner::{run_loaded_scenario, run_scenario, HarnessConfig, RunOutcome};
pub use scenario::{ControllerSpec, Scenario, ScenarioStep};
pub use surface::{
    AxisState, Completion, ControllerSet, HostRequest, HostRequestKind, SimulatedSurface,
    SurfaceConfig,
};
