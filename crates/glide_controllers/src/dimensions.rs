//! Per-axis scroll extents

use crate::error::{ensure_finite, Result, ScrollError};

/// Offset, scrollable range and viewport of one axis.
///
/// A value of this type always satisfies
/// `min_offset <= offset <= max_offset` and `viewport >= 0`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AxisDimensions {
    offset: f64,
    min_offset: f64,
    max_offset: f64,
    viewport: f64,
}

impl AxisDimensions {
    /// Validate the range and viewport, then clamp `offset` into range
    pub fn new(offset: f64, min_offset: f64, max_offset: f64, viewport: f64) -> Result<Self> {
        ensure_finite("offset", offset)?;
        ensure_finite("min_offset", min_offset)?;
        ensure_finite("max_offset", max_offset)?;
        ensure_finite("viewport", viewport)?;

        if max_offset < min_offset {
            return Err(ScrollError::invalid(
                "max_offset",
                max_offset,
                "must not be less than min_offset",
            ));
        }
        if viewport < 0.0 {
            return Err(ScrollError::invalid(
                "viewport",
                viewport,
                "must not be negative",
            ));
        }

        Ok(Self {
            offset: offset.clamp(min_offset, max_offset),
            min_offset,
            max_offset,
            viewport,
        })
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn min_offset(&self) -> f64 {
        self.min_offset
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    /// `max_offset - min_offset`
    pub fn range(&self) -> f64 {
        self.max_offset - self.min_offset
    }

    /// True when there is anything to scroll
    pub fn is_scrollable(&self) -> bool {
        self.range() > 0.0
    }

    /// Clamp an arbitrary offset into `[min_offset, max_offset]`
    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(self.min_offset, self.max_offset)
    }

    /// True if the range or viewport differ, which changes thumb size
    pub fn extent_differs(&self, other: &AxisDimensions) -> bool {
        self.min_offset != other.min_offset
            || self.max_offset != other.max_offset
            || self.viewport != other.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_clamped() {
        let dims = AxisDimensions::new(250.0, 0.0, 200.0, 100.0).unwrap();
        assert_eq!(dims.offset(), 200.0);

        let dims = AxisDimensions::new(-5.0, 10.0, 20.0, 0.0).unwrap();
        assert_eq!(dims.offset(), 10.0);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = AxisDimensions::new(0.0, 10.0, 5.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ScrollError::InvalidArgument {
                name: "max_offset",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_viewport() {
        let err = AxisDimensions::new(0.0, 0.0, 5.0, -1.0).unwrap_err();
        assert!(matches!(
            err,
            ScrollError::InvalidArgument {
                name: "viewport",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(AxisDimensions::new(f64::NAN, 0.0, 5.0, 1.0).is_err());
        assert!(AxisDimensions::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_empty_range_is_valid() {
        let dims = AxisDimensions::new(3.0, 0.0, 0.0, 50.0).unwrap();
        assert_eq!(dims.offset(), 0.0);
        assert!(!dims.is_scrollable());
    }
}
