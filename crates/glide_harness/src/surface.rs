//! Simulated host surface
//!
//! A deterministic stand-in for a scrollable element. It answers controller
//! requests with correlation ids, plays them out frame by frame (instantly,
//! through a keyframe animation or as decaying inertia), pushes the
//! resulting dimensions back and reports completion.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use glide_animation::{AnimationId, AnimationScheduler, ScrollAnimation};
use glide_controllers::{AnimationMode, CorrelationId, ScrollController, ScrollOptions};
use glide_core::{Orientation, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Host behavior knobs
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    /// Duration of the default animation for animated requests
    #[serde(default = "default_animation_ms")]
    pub default_animation_ms: u32,
    /// Logical milliseconds between frames
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,
    /// Decay applied to velocity requests that leave it unspecified
    #[serde(default = "default_inertia_decay")]
    pub default_inertia_decay: f32,
    /// Give the requests one user action raises on both axes the same id
    #[serde(default = "default_true")]
    pub coalesce_axes: bool,
}

fn default_animation_ms() -> u32 {
    300
}

fn default_frame_ms() -> u32 {
    16
}

fn default_inertia_decay() -> f32 {
    0.95
}

fn default_true() -> bool {
    true
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            default_animation_ms: default_animation_ms(),
            frame_ms: default_frame_ms(),
            default_inertia_decay: default_inertia_decay(),
            coalesce_axes: true,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            bail!("surface frame_ms must be > 0");
        }
        if !(0.0..=1.0).contains(&self.default_inertia_decay) {
            bail!(
                "surface default_inertia_decay must be within 0.0..=1.0, got {}",
                self.default_inertia_decay
            );
        }
        Ok(())
    }
}

/// The controllers a surface drives, looked up per axis
pub trait ControllerSet {
    fn controller_mut(&mut self, orientation: Orientation) -> Option<&mut dyn ScrollController>;

    /// Run work controllers deferred past the layout pass
    fn process_deferred(&mut self);
}

/// What a controller asked the host to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostRequestKind {
    ScrollTo { offset: f64, options: ScrollOptions },
    ScrollBy { delta: f64, options: ScrollOptions },
    AddVelocity { velocity: f64, inertia_decay: Option<f32> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostRequest {
    pub orientation: Orientation,
    pub id: CorrelationId,
    pub kind: HostRequestKind,
}

/// Issues correlation ids.
///
/// Inside a group opened with [`SimulatedSurface::grouped`], the first
/// request on each axis shares one id with the first request on the other.
/// Outside a group every request gets its own id.
#[derive(Debug)]
struct IdAllocator {
    next: i32,
    coalesce: bool,
    group: Option<Group>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Group {
    open: Option<(CorrelationId, Orientation)>,
}

impl IdAllocator {
    fn new(coalesce: bool) -> Self {
        Self {
            next: 1,
            coalesce,
            group: None,
        }
    }

    fn assign(&mut self, orientation: Orientation) -> Option<CorrelationId> {
        if let Some(group) = self.group.as_mut() {
            if let Some((id, first)) = group.open {
                if first != orientation {
                    group.open = None;
                    return Some(id);
                }
            }
        }
        let id = self.fresh()?;
        if let Some(group) = self.group.as_mut() {
            group.open = Some((id, orientation));
        }
        Some(id)
    }

    fn fresh(&mut self) -> Option<CorrelationId> {
        let raw = self.next;
        self.next = if raw == i32::MAX { 1 } else { raw + 1 };
        CorrelationId::from_raw(raw)
    }

    fn open_group(&mut self) {
        if self.coalesce {
            self.group = Some(Group::default());
        }
    }

    fn close_group(&mut self) {
        self.group = None;
    }
}

/// Content and viewport of one axis, plus its offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisState {
    pub extent: f64,
    pub viewport: f64,
    pub offset: f64,
}

impl AxisState {
    pub fn max_offset(&self) -> f64 {
        (self.extent - self.viewport).max(0.0)
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Instant(f64),
    Animation(AnimationId),
    Inertia { velocity: f64, decay: f32 },
}

#[derive(Debug, Clone, Copy)]
struct ActiveChange {
    orientation: Orientation,
    id: CorrelationId,
    motion: Motion,
}

/// A completion the surface delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub orientation: Orientation,
    pub id: CorrelationId,
    /// Superseded by a newer request on the same axis
    pub cancelled: bool,
}

/// Headless scrollable surface
pub struct SimulatedSurface {
    config: SurfaceConfig,
    axes: [AxisState; 2],
    requests: Rc<RefCell<VecDeque<HostRequest>>>,
    ids: Rc<RefCell<IdAllocator>>,
    interaction_requests: Rc<Cell<u32>>,
    active: Vec<ActiveChange>,
    scheduler: AnimationScheduler,
    completions: Vec<Completion>,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

fn axis_index(orientation: Orientation) -> usize {
    match orientation {
        Orientation::Horizontal => 0,
        Orientation::Vertical => 1,
    }
}

impl SimulatedSurface {
    pub fn new(config: SurfaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            axes: [AxisState::default(); 2],
            requests: Rc::new(RefCell::new(VecDeque::new())),
            ids: Rc::new(RefCell::new(IdAllocator::new(config.coalesce_axes))),
            interaction_requests: Rc::new(Cell::new(0)),
            active: Vec::new(),
            scheduler: AnimationScheduler::new(),
            completions: Vec::new(),
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn axis(&self, orientation: Orientation) -> &AxisState {
        &self.axes[axis_index(orientation)]
    }

    fn axis_mut(&mut self, orientation: Orientation) -> &mut AxisState {
        &mut self.axes[axis_index(orientation)]
    }

    pub fn offset(&self, orientation: Orientation) -> f64 {
        self.axis(orientation).offset
    }

    /// Both offsets as a point
    pub fn position(&self) -> Vec2 {
        Vec2::new(
            self.offset(Orientation::Horizontal),
            self.offset(Orientation::Vertical),
        )
    }

    /// Resize content and viewport. The offset is clamped into the new range.
    pub fn set_content(&mut self, orientation: Orientation, extent: f64, viewport: f64) -> Result<()> {
        if !extent.is_finite() || !viewport.is_finite() || extent < 0.0 || viewport < 0.0 {
            bail!("content extent and viewport must be finite and non-negative");
        }
        let axis = self.axis_mut(orientation);
        axis.extent = extent;
        axis.viewport = viewport;
        axis.offset = axis.clamp(axis.offset);
        Ok(())
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Interaction requests the surface accepted from touch or pen presses
    pub fn interaction_requests(&self) -> u32 {
        self.interaction_requests.get()
    }

    /// Requests raised but not yet picked up by a frame
    pub fn queued_requests(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Changes in flight
    pub fn active_changes(&self) -> usize {
        self.active.len()
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Start listening to `controller`'s requests
    pub fn attach(&self, controller: &mut dyn ScrollController) {
        let orientation = controller.orientation();
        let events = controller.events_mut();

        let (requests, ids) = (self.requests.clone(), self.ids.clone());
        events.scroll_to_requested.subscribe(move |req| {
            let Some(id) = ids.borrow_mut().assign(orientation) else {
                return;
            };
            req.correlation_id = Some(id);
            requests.borrow_mut().push_back(HostRequest {
                orientation,
                id,
                kind: HostRequestKind::ScrollTo {
                    offset: req.offset,
                    options: req.options,
                },
            });
        });

        let (requests, ids) = (self.requests.clone(), self.ids.clone());
        events.scroll_by_requested.subscribe(move |req| {
            let Some(id) = ids.borrow_mut().assign(orientation) else {
                return;
            };
            req.correlation_id = Some(id);
            requests.borrow_mut().push_back(HostRequest {
                orientation,
                id,
                kind: HostRequestKind::ScrollBy {
                    delta: req.delta,
                    options: req.options,
                },
            });
        });

        let (requests, ids) = (self.requests.clone(), self.ids.clone());
        events.add_velocity_requested.subscribe(move |req| {
            let Some(id) = ids.borrow_mut().assign(orientation) else {
                return;
            };
            req.correlation_id = Some(id);
            requests.borrow_mut().push_back(HostRequest {
                orientation,
                id,
                kind: HostRequestKind::AddVelocity {
                    velocity: req.velocity,
                    inertia_decay: req.inertia_decay,
                },
            });
        });

        let accepted = self.interaction_requests.clone();
        events.interaction_requested.subscribe(move |req| {
            accepted.set(accepted.get() + 1);
            req.handled = true;
        });

        debug!(%orientation, "controller attached to surface");
    }

    /// Run one user action, letting the requests it raises on both axes
    /// share a correlation id when `coalesce_axes` is set
    pub fn grouped<R>(&self, action: impl FnOnce() -> R) -> R {
        self.ids.borrow_mut().open_group();
        let result = action();
        self.ids.borrow_mut().close_group();
        result
    }

    /// Push current dimensions to every controller
    pub fn push_dimensions<C: ControllerSet + ?Sized>(&self, controllers: &mut C) -> Result<()> {
        for orientation in Orientation::ALL {
            let axis = *self.axis(orientation);
            if let Some(controller) = controllers.controller_mut(orientation) {
                controller
                    .set_dimensions(axis.offset, 0.0, axis.max_offset(), axis.viewport)
                    .with_context(|| format!("pushing {orientation} dimensions"))?;
            }
        }
        Ok(())
    }

    /// Run `frames` frames
    pub fn pump<C: ControllerSet + ?Sized>(&mut self, controllers: &mut C, frames: u32) -> Result<()> {
        for _ in 0..frames {
            self.step_frame(controllers)?;
        }
        Ok(())
    }

    fn step_frame<C: ControllerSet + ?Sized>(&mut self, controllers: &mut C) -> Result<()> {
        let dt_ms = self.config.frame_ms;
        let mut done = Vec::new();

        let queued: Vec<HostRequest> = self.requests.borrow_mut().drain(..).collect();
        for request in queued {
            self.start(controllers, request, &mut done);
        }

        self.scheduler.tick(dt_ms as f32);
        let mut still_active = Vec::with_capacity(self.active.len());
        for change in std::mem::take(&mut self.active) {
            match self.advance(change, dt_ms) {
                Some(change) => still_active.push(change),
                None => done.push(Completion {
                    orientation: change.orientation,
                    id: change.id,
                    cancelled: false,
                }),
            }
        }
        self.active = still_active;

        self.push_dimensions(controllers)?;
        controllers.process_deferred();

        for completion in done {
            trace!(?completion, "completing operation");
            if let Some(controller) = controllers.controller_mut(completion.orientation) {
                controller.notify_completed(completion.id);
            }
            self.completions.push(completion);
        }

        self.elapsed_frames += 1;
        self.elapsed_ms += dt_ms as u64;
        Ok(())
    }

    fn start<C: ControllerSet + ?Sized>(
        &mut self,
        controllers: &mut C,
        request: HostRequest,
        done: &mut Vec<Completion>,
    ) {
        let orientation = request.orientation;

        // A newer request on the same axis supersedes the one in flight
        if let Some(index) = self.active.iter().position(|c| c.orientation == orientation) {
            let superseded = self.active.remove(index);
            if let Motion::Animation(animation) = superseded.motion {
                self.scheduler.remove(animation);
            }
            done.push(Completion {
                orientation,
                id: superseded.id,
                cancelled: true,
            });
        }

        let axis = *self.axis(orientation);
        let (target, options) = match request.kind {
            HostRequestKind::ScrollTo { offset, options } => (axis.clamp(offset), options),
            HostRequestKind::ScrollBy { delta, options } => (axis.clamp(axis.offset + delta), options),
            HostRequestKind::AddVelocity {
                velocity,
                inertia_decay,
            } => {
                let decay = inertia_decay.unwrap_or(self.config.default_inertia_decay);
                debug!(%orientation, id = %request.id, velocity, decay, "inertia started");
                self.active.push(ActiveChange {
                    orientation,
                    id: request.id,
                    motion: Motion::Inertia { velocity, decay },
                });
                return;
            }
        };

        let motion = if options.animation == AnimationMode::Disabled || target == axis.offset {
            Motion::Instant(target)
        } else {
            let from = self.position();
            let to = from.with_along(orientation, target);
            let default = ScrollAnimation::linear(from, to, self.config.default_animation_ms);
            let animation = match controllers.controller_mut(orientation) {
                Some(controller) => controller.scroll_animation(request.id, from, default),
                None => default,
            };
            debug!(
                %orientation,
                id = %request.id,
                target,
                duration_ms = animation.duration_ms(),
                "animated change started"
            );
            Motion::Animation(self.scheduler.play(animation))
        };

        self.active.push(ActiveChange {
            orientation,
            id: request.id,
            motion,
        });
    }

    /// Move one change forward. Returns it back while unfinished.
    fn advance(&mut self, mut change: ActiveChange, dt_ms: u32) -> Option<ActiveChange> {
        let orientation = change.orientation;
        match change.motion {
            Motion::Instant(target) => {
                let axis = self.axis_mut(orientation);
                axis.offset = axis.clamp(target);
                None
            }
            Motion::Animation(animation) => {
                if let Some(value) = self.scheduler.value(animation) {
                    let axis = self.axis_mut(orientation);
                    axis.offset = axis.clamp(value.along(orientation));
                }
                if self.scheduler.is_finished(animation) {
                    self.scheduler.remove(animation);
                    None
                } else {
                    Some(change)
                }
            }
            Motion::Inertia { velocity, decay } => {
                let dt = dt_ms as f64 / 1000.0;
                let axis = self.axis_mut(orientation);
                let unclamped = axis.offset + velocity * dt;
                axis.offset = axis.clamp(unclamped);
                let hit_bound = axis.offset != unclamped;

                let velocity = velocity * (1.0 - decay as f64).powf(dt);
                if hit_bound || velocity.abs() < 1.0 {
                    None
                } else {
                    change.motion = Motion::Inertia { velocity, decay };
                    Some(change)
                }
            }
        }
    }
}

impl std::fmt::Debug for SimulatedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSurface")
            .field("config", &self.config)
            .field("axes", &self.axes)
            .field("queued_requests", &self.queued_requests())
            .field("active", &self.active)
            .field("elapsed_frames", &self.elapsed_frames)
            .finish()
    }
}
