//! Host-facing contract of the scroll controllers

use std::cell::RefCell;
use std::rc::Rc;

use glide_controllers::{
    compute_thumb_geometry, thumb_position, thumb_position_to_offset, AnimationMode,
    AxisDimensions, BiDirectionalScrollController, CorrelationId, OperationKind, Reconciled,
    ScrollBarController, ScrollController, ScrollError, ScrollOptions, ThumbScrollController,
};
use glide_core::{Orientation, Vec2};

fn id(raw: i32) -> CorrelationId {
    CorrelationId::from_raw(raw).unwrap()
}

fn every_controller() -> Vec<Box<dyn ScrollController>> {
    vec![
        Box::new(ThumbScrollController::new(Orientation::Vertical)),
        Box::new(ScrollBarController::new(Orientation::Horizontal)),
    ]
}

#[test]
fn stored_offset_is_always_clamped() {
    let cases = [
        (50.0, 0.0, 200.0, 100.0),
        (-10.0, 0.0, 200.0, 100.0),
        (900.0, 0.0, 200.0, 0.0),
        (5.0, 5.0, 5.0, 10.0),
        (-300.0, -250.0, -100.0, 20.0),
    ];
    for mut controller in every_controller() {
        for (offset, min, max, viewport) in cases {
            controller.set_dimensions(offset, min, max, viewport).unwrap();
            let dims = controller.dimensions();
            assert!(dims.min_offset() <= dims.offset() && dims.offset() <= dims.max_offset());
            assert_eq!(dims.offset(), offset.clamp(min, max));
        }
    }
}

#[test]
fn invalid_dimensions_leave_state_unchanged() {
    for mut controller in every_controller() {
        controller.set_dimensions(50.0, 0.0, 200.0, 100.0).unwrap();
        let before = controller.dimensions();

        let err = controller.set_dimensions(0.0, 10.0, 5.0, 1.0).unwrap_err();
        assert!(matches!(err, ScrollError::InvalidArgument { name: "max_offset", .. }));
        let err = controller.set_dimensions(0.0, 0.0, 5.0, -1.0).unwrap_err();
        assert!(matches!(err, ScrollError::InvalidArgument { name: "viewport", .. }));
        assert!(controller.set_dimensions(f64::NAN, 0.0, 5.0, 1.0).is_err());

        assert_eq!(controller.dimensions(), before);
    }
}

#[test]
fn mapping_round_trips_and_reflects() {
    let dims = AxisDimensions::new(0.0, 12.0, 1812.0, 333.0).unwrap();
    let track = 517.0;
    let thumb = compute_thumb_geometry(&dims, track, 40.0, false).length;

    let mut offset = dims.min_offset();
    while offset <= dims.max_offset() {
        let plain = thumb_position(offset, &dims, track, thumb, false);
        let mirrored = thumb_position(offset, &dims, track, thumb, true);
        assert!((mirrored - (track - thumb - plain)).abs() < 1e-9);

        for (position, is_mirrored) in [(plain, false), (mirrored, true)] {
            let back = thumb_position_to_offset(position, &dims, track, thumb, is_mirrored);
            assert!((back - offset).abs() < 1e-9, "offset={offset} back={back}");
        }
        offset += 37.5;
    }
}

#[test]
fn reference_thumb_scenario() {
    let dims = AxisDimensions::new(50.0, 0.0, 200.0, 100.0).unwrap();
    let geometry = compute_thumb_geometry(&dims, 300.0, 40.0, false);
    assert_eq!(geometry.length, 100.0);
    assert_eq!(geometry.position, 50.0);
    assert_eq!(thumb_position_to_offset(50.0, &dims, 300.0, 100.0, false), 50.0);
}

#[test]
fn requests_without_listener_are_untracked() {
    for mut controller in every_controller() {
        controller.set_dimensions(0.0, 0.0, 200.0, 100.0).unwrap();
        let id = controller.scroll_to(120.0, ScrollOptions::default()).unwrap();
        assert_eq!(CorrelationId::to_raw(id), CorrelationId::UNTRACKED);
        assert!(controller.pending_operations().is_empty());
    }
}

#[test]
fn completion_removes_only_the_matching_operation() {
    let mut thumb = ThumbScrollController::new(Orientation::Vertical);
    thumb.set_dimensions(0.0, 0.0, 1000.0, 100.0).unwrap();

    let next = Rc::new(RefCell::new(0));
    let counter = next.clone();
    thumb.events_mut().scroll_by_requested.subscribe(move |req| {
        *counter.borrow_mut() += 1;
        req.correlation_id = CorrelationId::from_raw(*counter.borrow());
    });
    let completed = Rc::new(RefCell::new(Vec::new()));
    let sink = completed.clone();
    thumb
        .events_mut()
        .scroll_completed
        .subscribe(move |done| sink.borrow_mut().push((done.correlation_id, done.kind)));

    thumb.scroll_by(10.0, ScrollOptions::default()).unwrap();
    thumb.scroll_by(20.0, ScrollOptions::default()).unwrap();
    assert_eq!(thumb.pending_operations().len(), 2);

    thumb.notify_completed(id(77));
    assert_eq!(thumb.pending_operations().len(), 2);
    assert!(completed.borrow().is_empty());

    thumb.notify_completed(id(1));
    assert_eq!(thumb.pending_operations().len(), 1);
    assert!(thumb.pending_operations().contains(id(2)));
    assert_eq!(*completed.borrow(), vec![(id(1), OperationKind::ScrollBy)]);
}

#[test]
fn pending_operation_holds_the_displayed_offset() {
    let mut thumb = ThumbScrollController::new(Orientation::Horizontal);
    thumb.set_track_length(300.0).unwrap();
    thumb.set_dimensions(50.0, 0.0, 200.0, 100.0).unwrap();
    thumb
        .events_mut()
        .scroll_to_requested
        .subscribe(|req| req.correlation_id = CorrelationId::from_raw(5));

    thumb.scroll_to(180.0, ScrollOptions::default()).unwrap();
    thumb.set_dimensions(120.0, 0.0, 150.0, 100.0).unwrap();
    assert_eq!(thumb.core().displayed_offset(), 50.0);
    assert_eq!(thumb.core().offset_target(), 150.0);

    thumb.notify_completed(id(5));
    assert_eq!(thumb.core().displayed_offset(), 120.0);
}

#[test]
fn two_axes_sharing_an_id_form_one_operation() {
    let mut bidi = BiDirectionalScrollController::new();
    for o in Orientation::ALL {
        let axis = bidi.axis_mut(o);
        axis.set_dimensions(0.0, 0.0, 500.0, 100.0).unwrap();
        axis.events_mut()
            .scroll_to_requested
            .subscribe(|req| req.correlation_id = CorrelationId::from_raw(7));
    }

    let reconciled = bidi.scroll_to(Vec2::new(100.0, 200.0), AnimationMode::Enabled).unwrap();
    assert_eq!(reconciled, Reconciled::Combined(id(7)));

    bidi.axis_mut(Orientation::Horizontal).notify_completed(id(7));
    bidi.axis_mut(Orientation::Vertical).notify_completed(id(7));

    for o in Orientation::ALL {
        assert!(bidi.axis(o).pending_operations().is_empty());
    }
    assert_eq!(bidi.pending_view_changes(), 0);
}
