//! Controllers built from a scenario and wired to a surface

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Result};
use glide_controllers::{
    AnimationMode, BiDirectionalScrollController, ControllerConfig, ScrollBarController,
    ScrollController, ScrollOptions, SnapPointsMode, ThumbScrollController,
};
use glide_core::{Orientation, PointerDevice, PointerInfo, Vec2};
use tracing::debug;

use crate::scenario::ControllerSpec;
use crate::surface::{ControllerSet, SimulatedSurface};

/// The controller a scenario drives
pub enum Rig {
    Thumb(ThumbScrollController),
    ScrollBar(ScrollBarController),
    BiDirectional {
        controller: BiDirectionalScrollController,
        view_changes: Rc<Cell<usize>>,
    },
}

impl Rig {
    pub fn build(spec: &ControllerSpec, config: &ControllerConfig) -> Result<Self> {
        let rig = match *spec {
            ControllerSpec::Thumb {
                orientation,
                track_length,
                mirrored,
                pannable,
                animation_style,
                duration_ms,
            } => {
                let mut thumb = ThumbScrollController::with_config(orientation, config.clone())?;
                thumb.set_track_length(track_length)?;
                thumb.set_mirrored(mirrored);
                thumb.set_pannable(pannable);
                thumb.set_animation_style(animation_style);
                thumb.set_overridden_duration_ms(duration_ms);
                Rig::Thumb(thumb)
            }
            ControllerSpec::ScrollBar { orientation } => {
                Rig::ScrollBar(ScrollBarController::with_config(orientation, config))
            }
            ControllerSpec::BiDirectional {
                track_width,
                track_height,
                railing,
            } => {
                let mut controller = BiDirectionalScrollController::with_config(config.clone())?;
                controller.set_track_size(Vec2::new(track_width, track_height))?;
                controller.set_railing(railing);

                let view_changes = Rc::new(Cell::new(0));
                let counter = view_changes.clone();
                controller.on_scroll_completed(move |_| counter.set(counter.get() + 1));
                Rig::BiDirectional {
                    controller,
                    view_changes,
                }
            }
        };
        debug!(kind = rig.kind(), "controller built");
        Ok(rig)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Rig::Thumb(_) => "thumb",
            Rig::ScrollBar(_) => "scroll_bar",
            Rig::BiDirectional { .. } => "bi_directional",
        }
    }

    /// Axes this rig drives
    pub fn orientations(&self) -> Vec<Orientation> {
        match self {
            Rig::Thumb(c) => vec![c.orientation()],
            Rig::ScrollBar(c) => vec![c.orientation()],
            Rig::BiDirectional { .. } => Orientation::ALL.to_vec(),
        }
    }

    /// Route every axis's requests to `surface`
    pub fn attach(&mut self, surface: &SimulatedSurface) {
        match self {
            Rig::Thumb(c) => surface.attach(c),
            Rig::ScrollBar(c) => surface.attach(c),
            Rig::BiDirectional { controller, .. } => {
                for orientation in Orientation::ALL {
                    surface.attach(controller.axis_mut(orientation));
                }
            }
        }
    }

    pub fn controller(&self, orientation: Orientation) -> Option<&dyn ScrollController> {
        match self {
            Rig::Thumb(c) if c.orientation() == orientation => Some(c),
            Rig::ScrollBar(c) if c.orientation() == orientation => Some(c),
            Rig::BiDirectional { controller, .. } => Some(controller.axis(orientation)),
            _ => None,
        }
    }

    /// Combined two-axis view changes that completed
    pub fn view_changes_completed(&self) -> Option<usize> {
        match self {
            Rig::BiDirectional { view_changes, .. } => Some(view_changes.get()),
            _ => None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Rig::Thumb(c) => c.set_enabled(enabled),
            Rig::ScrollBar(c) => c.set_enabled(enabled),
            Rig::BiDirectional { controller, .. } => controller.set_enabled(enabled),
        }
    }

    pub fn scroll_to(&mut self, x: Option<f64>, y: Option<f64>, animation: AnimationMode) -> Result<()> {
        let options = ScrollOptions::new(animation, SnapPointsMode::Default);
        match self {
            Rig::BiDirectional { controller, .. } => {
                let current = |o: Orientation| controller.axis(o).core().displayed_offset();
                let target = Vec2::new(
                    x.unwrap_or_else(|| current(Orientation::Horizontal)),
                    y.unwrap_or_else(|| current(Orientation::Vertical)),
                );
                controller.scroll_to(target, animation)?;
            }
            _ => {
                let offset = self.along(x, y)?;
                self.single_mut()?.scroll_to(offset, options)?;
            }
        }
        Ok(())
    }

    pub fn scroll_by(&mut self, x: Option<f64>, y: Option<f64>, animation: AnimationMode) -> Result<()> {
        let options = ScrollOptions::new(animation, SnapPointsMode::Default);
        match self {
            Rig::BiDirectional { controller, .. } => {
                controller.scroll_by(Vec2::new(x.unwrap_or(0.0), y.unwrap_or(0.0)), animation)?;
            }
            _ => {
                let delta = self.along(x, y)?;
                self.single_mut()?.scroll_by(delta, options)?;
            }
        }
        Ok(())
    }

    pub fn pointer_pressed(&mut self, device: PointerDevice, position: Vec2) -> Result<()> {
        let pointer = PointerInfo::new(device, position);
        match self {
            Rig::Thumb(c) => c.on_pointer_pressed(pointer),
            Rig::BiDirectional { controller, .. } => controller.on_pointer_pressed(pointer),
            Rig::ScrollBar(_) => bail!("scroll_bar controllers take scrollbar_event steps, not pointer presses"),
        };
        Ok(())
    }

    pub fn drag_delta(&mut self, cumulative: Vec2) -> Result<()> {
        match self {
            Rig::Thumb(c) => {
                c.on_drag_delta(cumulative.along(c.orientation()))?;
            }
            Rig::BiDirectional { controller, .. } => {
                controller.on_drag_delta(cumulative)?;
            }
            Rig::ScrollBar(_) => bail!("scroll_bar controllers have no draggable thumb"),
        }
        Ok(())
    }

    pub fn drag_completed(&mut self) -> Result<()> {
        match self {
            Rig::Thumb(c) => c.on_drag_completed(),
            Rig::BiDirectional { controller, .. } => controller.on_drag_completed(),
            Rig::ScrollBar(_) => bail!("scroll_bar controllers have no draggable thumb"),
        }
        Ok(())
    }

    pub fn track_pressed(&mut self, position: Vec2) -> Result<()> {
        match self {
            Rig::Thumb(c) => {
                c.on_track_pressed(position.along(c.orientation()))?;
            }
            Rig::BiDirectional { controller, .. } => {
                controller.on_track_pressed(position)?;
            }
            Rig::ScrollBar(_) => bail!("scroll_bar controllers take large_increment events for track presses"),
        }
        Ok(())
    }

    pub fn step(&mut self, forward: bool) -> Result<()> {
        match self {
            Rig::Thumb(c) if forward => c.increment().map(drop)?,
            Rig::Thumb(c) => c.decrement().map(drop)?,
            Rig::ScrollBar(c) if forward => c.small_increment().map(drop)?,
            Rig::ScrollBar(c) => c.small_decrement().map(drop)?,
            Rig::BiDirectional { .. } => bail!("bi_directional controllers take velocity_button steps"),
        }
        Ok(())
    }

    /// Thumb position and length along `orientation`
    pub fn thumb(&self, orientation: Orientation) -> Result<(f64, f64)> {
        match self {
            Rig::Thumb(c) if c.orientation() == orientation => {
                Ok((c.thumb_position(), c.thumb_length()))
            }
            Rig::BiDirectional { controller, .. } => {
                let axis = controller.axis(orientation);
                Ok((axis.thumb_position(), axis.thumb_length()))
            }
            Rig::ScrollBar(_) => bail!("scroll_bar controllers expose no thumb geometry"),
            Rig::Thumb(_) => bail!("thumb controller has no {orientation} axis"),
        }
    }

    /// Component of `x`/`y` along a single-axis controller's orientation
    fn along(&self, x: Option<f64>, y: Option<f64>) -> Result<f64> {
        let orientation = self.orientations()[0];
        let value = match orientation {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        };
        match value {
            Some(value) => Ok(value),
            None => bail!("{} controller needs a value for its {orientation} axis", self.kind()),
        }
    }

    fn single_mut(&mut self) -> Result<&mut dyn ScrollController> {
        match self {
            Rig::Thumb(c) => Ok(c),
            Rig::ScrollBar(c) => Ok(c),
            Rig::BiDirectional { .. } => bail!("bi_directional controllers drive two axes"),
        }
    }
}

impl ControllerSet for Rig {
    fn controller_mut(&mut self, orientation: Orientation) -> Option<&mut dyn ScrollController> {
        match self {
            Rig::Thumb(c) if c.orientation() == orientation => Some(c),
            Rig::ScrollBar(c) if c.orientation() == orientation => Some(c),
            Rig::BiDirectional { controller, .. } => Some(controller.axis_mut(orientation)),
            _ => None,
        }
    }

    fn process_deferred(&mut self) {
        match self {
            Rig::Thumb(c) => c.process_deferred(),
            Rig::ScrollBar(c) => c.process_deferred(),
            Rig::BiDirectional { controller, .. } => controller.process_deferred(),
        }
    }
}

impl std::fmt::Debug for Rig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rig::Thumb(c) => f.debug_tuple("Thumb").field(c).finish(),
            Rig::ScrollBar(c) => f.debug_tuple("ScrollBar").field(c).finish(),
            Rig::BiDirectional { controller, .. } => {
                f.debug_tuple("BiDirectional").field(controller).finish()
            }
        }
    }
}
