//! Scenario runner driving a controller against the simulated surface.

use anyhow::{Context, Result};
use glide_controllers::ControllerConfig;
use glide_core::{Orientation, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assert::{evaluate_close, evaluate_count, evaluate_flag, AssertionResult};
use crate::report::HeadlessReport;
use crate::rig::Rig;
use crate::scenario::{Scenario, ScenarioStep};
use crate::surface::{ControllerSet, SimulatedSurface, SurfaceConfig};

/// Controller tuning plus host behavior for a run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with default tuning.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    let scenario = Scenario::from_json(input)?;
    run_loaded_scenario(&scenario, &HarnessConfig::default())
}

/// Execute a pre-loaded scenario.
///
/// Steps that misuse the controller (a drag on a scrollbar, an invalid
/// dimension) abort the run with an error. Failed assertions produce a
/// [`RunOutcome::Failed`] report.
pub fn run_loaded_scenario(scenario: &Scenario, config: &HarnessConfig) -> Result<RunOutcome> {
    let mut surface = SimulatedSurface::new(config.surface)?;
    let mut rig = Rig::build(&scenario.controller, &config.controller)?;
    rig.attach(&surface);
    surface.push_dimensions(&mut rig)?;
    rig.process_deferred();

    info!(
        scenario = scenario.name.as_deref().unwrap_or("<unnamed>"),
        controller = rig.kind(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        let result = execute_step(step, &mut surface, &mut rig)
            .with_context(|| format!("step {step_index} ({})", step.name()))?;
        if let AssertionResult::Failed { code, message } = result {
            let report = HeadlessReport::failed(
                step.name(),
                step_index,
                format!("[{code}] {message}"),
                surface.elapsed_frames(),
                surface.elapsed_ms(),
            );
            info!(step_index, assertion = step.name(), "scenario failed");
            return Ok(RunOutcome::Failed {
                report: finish(report, scenario, &surface),
            });
        }
    }

    let report = HeadlessReport::passed(surface.elapsed_frames(), surface.elapsed_ms());
    info!(frames = surface.elapsed_frames(), "scenario passed");
    Ok(RunOutcome::Passed {
        report: finish(report, scenario, &surface),
    })
}

fn finish(report: HeadlessReport, scenario: &Scenario, surface: &SimulatedSurface) -> HeadlessReport {
    let position = surface.position();
    report
        .with_scenario(scenario.name.as_deref())
        .with_final_state([position.x, position.y], surface.completions().len())
}

fn execute_step(
    step: &ScenarioStep,
    surface: &mut SimulatedSurface,
    rig: &mut Rig,
) -> Result<AssertionResult> {
    debug!(step = step.name(), "executing step");
    match *step {
        ScenarioStep::SetContent {
            orientation,
            extent,
            viewport,
        } => {
            surface.set_content(orientation, extent, viewport)?;
            surface.push_dimensions(rig)?;
            rig.process_deferred();
        }
        ScenarioStep::SetEnabled { enabled } => rig.set_enabled(enabled),
        ScenarioStep::SetScrollMode { orientation, mode } => {
            for o in targets(rig, orientation) {
                if let Some(controller) = rig.controller_mut(o) {
                    controller.set_scroll_mode(mode);
                }
            }
        }
        ScenarioStep::ScrollTo { x, y, animation } => {
            surface.grouped(|| rig.scroll_to(x, y, animation))?
        }
        ScenarioStep::ScrollBy { x, y, animation } => {
            surface.grouped(|| rig.scroll_by(x, y, animation))?
        }
        ScenarioStep::PointerPressed { device, x, y } => {
            surface.grouped(|| rig.pointer_pressed(device, Vec2::new(x, y)))?
        }
        ScenarioStep::DragDelta { x, y } => surface.grouped(|| rig.drag_delta(Vec2::new(x, y)))?,
        ScenarioStep::DragCompleted => surface.grouped(|| rig.drag_completed())?,
        ScenarioStep::TrackPressed { x, y } => {
            surface.grouped(|| rig.track_pressed(Vec2::new(x, y)))?
        }
        ScenarioStep::Increment => surface.grouped(|| rig.step(true))?,
        ScenarioStep::Decrement => surface.grouped(|| rig.step(false))?,
        ScenarioStep::ScrollbarEvent { event, value } => match rig {
            Rig::ScrollBar(scrollbar) => {
                surface.grouped(|| scrollbar.on_scroll(event, value))?;
            }
            _ => anyhow::bail!("{} controllers take no scrollbar events", rig.kind()),
        },
        ScenarioStep::VelocityButton { direction } => match rig {
            Rig::BiDirectional { controller, .. } => {
                surface.grouped(|| controller.velocity_button(direction))?;
            }
            _ => anyhow::bail!("{} controllers have no velocity buttons", rig.kind()),
        },
        ScenarioStep::Pump { frames } => surface.pump(rig, frames)?,
        ScenarioStep::Settle { max_frames } => {
            let mut frames = 0;
            while is_busy(surface) && frames < max_frames {
                surface.pump(rig, 1)?;
                frames += 1;
            }
            if is_busy(surface) {
                return Ok(AssertionResult::Failed {
                    code: "not_settled".to_string(),
                    message: format!(
                        "{} queued, {} in flight after {max_frames} frames",
                        surface.queued_requests(),
                        surface.active_changes()
                    ),
                });
            }
        }
        ScenarioStep::AssertOffset {
            orientation,
            value,
            tolerance,
        } => {
            return Ok(evaluate_close(
                &format!("{orientation} offset"),
                value,
                surface.offset(orientation),
                tolerance,
            ));
        }
        ScenarioStep::AssertThumb {
            orientation,
            position,
            length,
            tolerance,
        } => {
            let orientation = orientation.unwrap_or(rig.orientations()[0]);
            let (actual_position, actual_length) = rig.thumb(orientation)?;
            let mut result = AssertionResult::Passed;
            if let Some(expected) = position {
                result = result.and(evaluate_close(
                    &format!("{orientation} thumb position"),
                    expected,
                    actual_position,
                    tolerance,
                ));
            }
            if let Some(expected) = length {
                result = result.and(evaluate_close(
                    &format!("{orientation} thumb length"),
                    expected,
                    actual_length,
                    tolerance,
                ));
            }
            return Ok(result);
        }
        ScenarioStep::AssertPending { orientation, count } => {
            let rig: &Rig = rig;
            let actual = targets(rig, orientation)
                .into_iter()
                .filter_map(|o| rig.controller(o))
                .map(|c| c.pending_operations().len())
                .sum();
            return Ok(evaluate_count("pending operations", count, actual));
        }
        ScenarioStep::AssertInteractionsAllowed {
            orientation,
            expected,
        } => {
            let orientation = orientation.unwrap_or(rig.orientations()[0]);
            let actual = rig
                .controller(orientation)
                .map(|c| c.are_interactions_allowed())
                .with_context(|| format!("{} controller has no {orientation} axis", rig.kind()))?;
            return Ok(evaluate_flag(
                &format!("{orientation} interactions allowed"),
                expected,
                actual,
            ));
        }
        ScenarioStep::AssertCompleted {
            count,
            view_changes,
        } => {
            let mut result = evaluate_count("completed operations", count, surface.completions().len());
            if let Some(expected) = view_changes {
                let actual = rig
                    .view_changes_completed()
                    .with_context(|| format!("{} controllers raise no view changes", rig.kind()))?;
                result = result.and(evaluate_count("completed view changes", expected, actual));
            }
            return Ok(result);
        }
    }
    Ok(AssertionResult::Passed)
}

fn is_busy(surface: &SimulatedSurface) -> bool {
    surface.queued_requests() > 0 || surface.active_changes() > 0
}

fn targets(rig: &Rig, orientation: Option<Orientation>) -> Vec<Orientation> {
    match orientation {
        Some(o) => vec![o],
        None => rig.orientations(),
    }
}
