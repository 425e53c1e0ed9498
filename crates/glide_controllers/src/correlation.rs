//! Correlation tracking
//!
//! Hosts answer every scroll request with a correlation id and later report
//! completion with the same id. Controllers keep the requests they still
//! wait on in a [`CorrelationTracker`].

use std::fmt;

use glide_core::Orientation;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Identifier a host assigns to one requested view change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(i32);

impl CorrelationId {
    /// Raw value hosts use for "not tracked"
    pub const UNTRACKED: i32 = -1;

    /// Wrap a raw id. The untracked sentinel maps to `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        (raw != Self::UNTRACKED).then_some(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Raw value of an optional id, using the sentinel for `None`
    pub fn to_raw(id: Option<Self>) -> i32 {
        id.map_or(Self::UNTRACKED, Self::get)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Class of request an id was issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    ScrollTo,
    ScrollBy,
    AddVelocity,
}

/// What a pending request asked for
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Requested {
    Target(f64),
    Delta(f64),
    Velocity {
        velocity: f64,
        inertia_decay: Option<f32>,
    },
}

impl Requested {
    pub fn kind(&self) -> OperationKind {
        match self {
            Requested::Target(_) => OperationKind::ScrollTo,
            Requested::Delta(_) => OperationKind::ScrollBy,
            Requested::Velocity { .. } => OperationKind::AddVelocity,
        }
    }
}

/// A request the host accepted and has not yet completed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingOperation {
    pub id: CorrelationId,
    pub requested: Requested,
    /// Offset change relative to the pending target when the request was raised
    pub relative_change: f64,
    /// Offset the controller expects once the request completes
    pub offset_target: f64,
}

impl PendingOperation {
    pub fn new(id: CorrelationId, requested: Requested, relative_change: f64, offset_target: f64) -> Self {
        Self {
            id,
            requested,
            relative_change,
            offset_target,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.requested.kind()
    }
}

/// Pending operations keyed by correlation id, in request order
#[derive(Debug, Default)]
pub struct CorrelationTracker {
    pending: IndexMap<CorrelationId, PendingOperation, FxBuildHasher>,
}

impl CorrelationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `operation`.
    ///
    /// Returns false if its id is already pending; the first entry wins.
    pub fn track(&mut self, operation: PendingOperation) -> bool {
        if self.pending.contains_key(&operation.id) {
            tracing::trace!(id = %operation.id, "correlation id already tracked");
            return false;
        }
        self.pending.insert(operation.id, operation);
        true
    }

    /// Stop tracking `id`. Unknown ids are ignored and yield `None`.
    pub fn complete(&mut self, id: CorrelationId) -> Option<PendingOperation> {
        let operation = self.pending.shift_remove(&id);
        match &operation {
            Some(op) => tracing::debug!(id = %id, kind = ?op.kind(), "operation completed"),
            None => tracing::trace!(id = %id, "completion for untracked id ignored"),
        }
        operation
    }

    pub fn get(&self, id: CorrelationId) -> Option<&PendingOperation> {
        self.pending.get(&id)
    }

    pub fn contains(&self, id: CorrelationId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending operations of one kind
    pub fn count_of(&self, kind: OperationKind) -> usize {
        self.pending.values().filter(|op| op.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingOperation> {
        self.pending.values()
    }

    /// Most recently tracked operation
    pub fn latest(&self) -> Option<&PendingOperation> {
        self.pending.last().map(|(_, op)| op)
    }

    /// Forget every pending operation
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Outcome of a request raised on both axes at once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Neither axis is tracked
    Untracked,
    /// Only one axis returned an id
    Single(Orientation, CorrelationId),
    /// Both axes returned the same id: one combined operation
    Combined(CorrelationId),
    /// The axes returned different ids, tracked and completed independently
    Independent {
        horizontal: CorrelationId,
        vertical: CorrelationId,
    },
}

impl Reconciled {
    /// The single id standing for the whole request, if there is one
    pub fn id(&self) -> Option<CorrelationId> {
        match self {
            Reconciled::Single(_, id) | Reconciled::Combined(id) => Some(*id),
            Reconciled::Untracked | Reconciled::Independent { .. } => None,
        }
    }

    /// Every distinct id that must complete
    pub fn ids(&self) -> SmallVec<[CorrelationId; 2]> {
        let mut ids = SmallVec::new();
        match *self {
            Reconciled::Untracked => {}
            Reconciled::Single(_, id) | Reconciled::Combined(id) => ids.push(id),
            Reconciled::Independent {
                horizontal,
                vertical,
            } => {
                ids.push(horizontal);
                ids.push(vertical);
            }
        }
        ids
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Reconciled::Untracked)
    }
}

/// Combine the ids a host returned for the two halves of one request
pub fn reconcile(horizontal: Option<CorrelationId>, vertical: Option<CorrelationId>) -> Reconciled {
    match (horizontal, vertical) {
        (Some(h), Some(v)) if h == v => Reconciled::Combined(h),
        (Some(h), Some(v)) => {
            tracing::warn!(
                horizontal = %h,
                vertical = %v,
                "axes returned different correlation ids, tracking them independently"
            );
            Reconciled::Independent {
                horizontal: h,
                vertical: v,
            }
        }
        (Some(h), None) => Reconciled::Single(Orientation::Horizontal, h),
        (None, Some(v)) => Reconciled::Single(Orientation::Vertical, v),
        (None, None) => Reconciled::Untracked,
    }
}
