//! Glide Scroll Controllers
//!
//! Pluggable adapters between a scrollable host surface and the UI that
//! drives and reflects its offset.
//!
//! # Features
//!
//! - **Adapter Contract**: [`ScrollController`] with dimension updates,
//!   upward scroll requests and correlated completions
//! - **Thumb Controller**: Draggable thumb, track paging and repeat buttons
//! - **Scrollbar Controller**: Range scrollbar events mapped to immediate requests
//! - **Two-Axis Controller**: A 2D thumb reconciling ids across both axes
//! - **Visual Mapping**: Pure offset/thumb conversions with mirroring
//!
//! # Example
//!
//! ```rust
//! use glide_controllers::{CorrelationId, ScrollController, ThumbScrollController};
//! use glide_core::Orientation;
//!
//! let mut thumb = ThumbScrollController::new(Orientation::Vertical);
//! thumb.set_track_length(300.0).unwrap();
//! thumb.set_dimensions(50.0, 0.0, 200.0, 100.0).unwrap();
//! thumb.process_deferred();
//! assert_eq!(thumb.thumb_length(), 100.0);
//! assert_eq!(thumb.thumb_position(), 50.0);
//!
//! // The host answers requests by writing a correlation id into the payload
//! thumb
//!     .events_mut()
//!     .scroll_to_requested
//!     .subscribe(|req| req.correlation_id = CorrelationId::from_raw(1));
//! let id = thumb.on_track_pressed(250.0).unwrap();
//! assert_eq!(id, CorrelationId::from_raw(1));
//! ```

pub mod bidirectional;
pub mod config;
pub mod controller;
pub mod correlation;
pub mod dimensions;
pub mod error;
pub mod interaction;
pub mod mapping;
pub mod scrollbar;
pub mod thumb;

pub use bidirectional::{
    BiDirectionalScrollController, UniScrollController, VelocityDirection, ViewChangeCompleted,
};
pub use config::ControllerConfig;
pub use controller::{
    AddVelocityRequest, AnimationMode, ControllerCore, ControllerEvents, InteractionInfo,
    InteractionRequest, ScrollByRequest, ScrollCompleted, ScrollController, ScrollOptions,
    ScrollToRequest, SnapPointsMode,
};
pub use correlation::{
    reconcile, CorrelationId, CorrelationTracker, OperationKind, PendingOperation, Reconciled,
    Requested,
};
pub use dimensions::AxisDimensions;
pub use error::{Result, ScrollError};
pub use interaction::{InteractionEvent, InteractionState, InteractionTracker, ScrollMode};
pub use mapping::{
    compute_thumb_geometry, offset_multiplier, thumb_length, thumb_position,
    thumb_position_to_offset, ThumbGeometry, ThumbTrack,
};
pub use scrollbar::{ScrollBarController, ScrollEventType};
pub use thumb::{ThumbScrollController, TrackHit};
