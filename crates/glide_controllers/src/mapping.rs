//! Offset-to-visual mapping
//!
//! Pure functions between a logical offset range and the thumb drawn on a
//! track of a given length. A mirrored axis (right-to-left horizontal, for
//! instance) places `max_offset` at the start of the track.

use crate::dimensions::AxisDimensions;

/// Thumb length and position along its track
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ThumbGeometry {
    pub length: f64,
    pub position: f64,
}

/// Length of the thumb for `dims` on a track of `track_length`.
///
/// Proportional to the visible fraction of the content, floored at
/// `min_thumb_length` but never longer than the track. An empty viewport
/// yields the floor.
pub fn thumb_length(dims: &AxisDimensions, track_length: f64, min_thumb_length: f64) -> f64 {
    let track_length = track_length.max(0.0);
    let floor = min_thumb_length.min(track_length).max(0.0);

    if dims.viewport() == 0.0 {
        return floor;
    }

    let visible_fraction = dims.viewport() / (dims.range() + dims.viewport());
    (visible_fraction * track_length).max(floor)
}

/// Room the thumb has to move
#[inline]
pub fn thumb_travel(track_length: f64, thumb_length: f64) -> f64 {
    (track_length - thumb_length).max(0.0)
}

/// Thumb position for `offset`, clamped into the range of `dims` first.
///
/// An empty range maps to position 0.
pub fn thumb_position(
    offset: f64,
    dims: &AxisDimensions,
    track_length: f64,
    thumb_length: f64,
    mirrored: bool,
) -> f64 {
    let range = dims.range();
    if range <= 0.0 {
        return 0.0;
    }

    let offset = dims.clamp(offset);
    let travel = thumb_travel(track_length, thumb_length);
    let progress = if mirrored {
        (dims.max_offset() - offset) / range
    } else {
        (offset - dims.min_offset()) / range
    };
    progress * travel
}

/// Thumb length and position for the current offset of `dims`
pub fn compute_thumb_geometry(
    dims: &AxisDimensions,
    track_length: f64,
    min_thumb_length: f64,
    mirrored: bool,
) -> ThumbGeometry {
    let length = thumb_length(dims, track_length, min_thumb_length);
    ThumbGeometry {
        length,
        position: thumb_position(dims.offset(), dims, track_length, length, mirrored),
    }
}

/// Offset that puts the thumb at `position`.
///
/// Positions outside the track are clamped. With no room to move
/// (`track_length == thumb_length`) every position maps to `min_offset`.
pub fn thumb_position_to_offset(
    position: f64,
    dims: &AxisDimensions,
    track_length: f64,
    thumb_length: f64,
    mirrored: bool,
) -> f64 {
    let travel = thumb_travel(track_length, thumb_length);
    if travel <= 0.0 {
        return dims.min_offset();
    }

    let position = position.clamp(0.0, travel);
    let (start, end) = if mirrored {
        (dims.max_offset(), dims.min_offset())
    } else {
        (dims.min_offset(), dims.max_offset())
    };

    // Exact at both ends of the track
    if position == 0.0 {
        return start;
    }
    if position == travel {
        return end;
    }

    let progress = position / travel;
    dims.clamp(start + (end - start) * progress)
}

/// Offset units the content moves per unit of thumb movement.
///
/// Hosts that drive the thumb visual directly multiply the scroll offset by
/// this value. It is negative because the thumb and the content move in
/// opposite directions, flipped again for a mirrored thumb, and zero when
/// the thumb fills the track.
pub fn offset_multiplier(
    dims: &AxisDimensions,
    track_length: f64,
    thumb_length: f64,
    mirrored: bool,
) -> f64 {
    if track_length == thumb_length {
        return 0.0;
    }

    let multiplier = dims.range() / (thumb_length - track_length);
    if mirrored {
        -multiplier
    } else {
        multiplier
    }
}

/// Track and thumb lengths of one axis, plus the multiplier derived from them
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbTrack {
    track_length: f64,
    thumb_length: f64,
    min_thumb_length: f64,
    mirrored: bool,
    multiplier: f64,
}

impl ThumbTrack {
    pub fn new(min_thumb_length: f64) -> Self {
        Self {
            track_length: 0.0,
            thumb_length: 0.0,
            min_thumb_length,
            mirrored: false,
            multiplier: 0.0,
        }
    }

    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    pub fn thumb_length(&self) -> f64 {
        self.thumb_length
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn travel(&self) -> f64 {
        thumb_travel(self.track_length, self.thumb_length)
    }

    pub(crate) fn set_track_length(&mut self, track_length: f64) {
        self.track_length = track_length;
    }

    pub(crate) fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    /// Recompute the thumb length. Returns true if it changed.
    pub(crate) fn update_thumb_length(&mut self, dims: &AxisDimensions) -> bool {
        let length = thumb_length(dims, self.track_length, self.min_thumb_length);
        let changed = length != self.thumb_length;
        self.thumb_length = length;
        changed
    }

    pub(crate) fn update_multiplier(&mut self, dims: &AxisDimensions) -> f64 {
        self.multiplier = offset_multiplier(dims, self.track_length, self.thumb_length, self.mirrored);
        self.multiplier
    }

    pub fn position(&self, offset: f64, dims: &AxisDimensions) -> f64 {
        thumb_position(offset, dims, self.track_length, self.thumb_length, self.mirrored)
    }

    pub fn offset_at(&self, position: f64, dims: &AxisDimensions) -> f64 {
        thumb_position_to_offset(position, dims, self.track_length, self.thumb_length, self.mirrored)
    }

    pub fn geometry(&self, offset: f64, dims: &AxisDimensions) -> ThumbGeometry {
        ThumbGeometry {
            length: self.thumb_length,
            position: self.position(offset, dims),
        }
    }
}
