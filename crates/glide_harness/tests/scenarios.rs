//! End-to-end controller runs against the simulated surface

use glide_animation::AnimationStyle;
use glide_controllers::{
    AnimationMode, ControllerConfig, CorrelationId, Reconciled, ScrollController,
};
use glide_core::{Orientation, Vec2};
use glide_harness::{
    run_loaded_scenario, run_scenario, ControllerSet, ControllerSpec, HarnessConfig, Rig,
    Scenario, SimulatedSurface, SurfaceConfig,
};

fn assert_passes(json: &str) {
    let outcome = run_scenario(json).unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn thumb_drag_follows_pointer() {
    assert_passes(
        r#"{
            "name": "thumb drag",
            "controller": { "kind": "thumb", "orientation": "vertical", "track_length": 300 },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 300, "viewport": 100 },
                { "type": "assert_thumb", "length": 100, "position": 0 },
                { "type": "pointer_pressed", "device": "mouse", "y": 20 },
                { "type": "drag_delta", "y": 50 },
                { "type": "assert_thumb", "position": 50 },
                { "type": "pump", "frames": 1 },
                { "type": "assert_offset", "orientation": "vertical", "value": 50 },
                { "type": "assert_pending", "count": 0 },
                { "type": "drag_delta", "y": 500 },
                { "type": "pump", "frames": 1 },
                { "type": "assert_offset", "orientation": "vertical", "value": 200 },
                { "type": "drag_completed" },
                { "type": "assert_completed", "count": 2 }
            ]
        }"#,
    );
}

#[test]
fn mirrored_thumb_pages_the_other_way() {
    assert_passes(
        r#"{
            "controller": {
                "kind": "thumb", "orientation": "horizontal", "track_length": 300, "mirrored": true
            },
            "steps": [
                { "type": "set_content", "orientation": "horizontal", "extent": 300, "viewport": 100 },
                { "type": "assert_thumb", "position": 200 },
                { "type": "track_pressed", "x": 20 },
                { "type": "settle" },
                { "type": "assert_offset", "orientation": "horizontal", "value": 100 },
                { "type": "assert_thumb", "position": 100 }
            ]
        }"#,
    );
}

#[test]
fn touch_press_is_handed_to_the_host() {
    let scenario = Scenario::from_json(
        r#"{
            "controller": { "kind": "thumb", "orientation": "vertical", "track_length": 300 },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 300, "viewport": 100 },
                { "type": "pointer_pressed", "device": "touch", "y": 10 },
                { "type": "drag_delta", "y": 50 },
                { "type": "pump", "frames": 1 },
                { "type": "assert_offset", "orientation": "vertical", "value": 0 }
            ]
        }"#,
    )
    .unwrap();
    let outcome = run_loaded_scenario(&scenario, &HarnessConfig::default()).unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn repeat_buttons_coast_to_a_stop() {
    assert_passes(
        r#"{
            "controller": { "kind": "thumb", "orientation": "vertical", "track_length": 300 },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 1000, "viewport": 100 },
                { "type": "increment" },
                { "type": "assert_pending", "count": 1 },
                { "type": "settle" },
                { "type": "assert_pending", "count": 0 },
                { "type": "assert_offset", "orientation": "vertical", "value": 38, "tolerance": 5 },
                { "type": "decrement" },
                { "type": "settle" },
                { "type": "assert_offset", "orientation": "vertical", "value": 0, "tolerance": 5 }
            ]
        }"#,
    );
}

#[test]
fn scrollbar_steps_and_drag() {
    assert_passes(
        r#"{
            "controller": { "kind": "scroll_bar", "orientation": "vertical" },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 500, "viewport": 100 },
                { "type": "increment" },
                { "type": "pump", "frames": 1 },
                { "type": "increment" },
                { "type": "pump", "frames": 1 },
                { "type": "assert_offset", "orientation": "vertical", "value": 32 },
                { "type": "scrollbar_event", "event": "thumb_track", "value": 250 },
                { "type": "assert_interactions_allowed", "expected": false },
                { "type": "pump", "frames": 1 },
                { "type": "scrollbar_event", "event": "end_scroll" },
                { "type": "assert_interactions_allowed", "expected": true },
                { "type": "assert_offset", "orientation": "vertical", "value": 250 },
                { "type": "assert_completed", "count": 3 }
            ]
        }"#,
    );
}

#[test]
fn scrollbar_steps_add_up_before_the_host_answers() {
    assert_passes(
        r#"{
            "controller": { "kind": "scroll_bar", "orientation": "vertical" },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 500, "viewport": 100 },
                { "type": "increment" },
                { "type": "increment" },
                { "type": "increment" },
                { "type": "assert_pending", "count": 3 },
                { "type": "settle" },
                { "type": "assert_offset", "orientation": "vertical", "value": 48 },
                { "type": "assert_pending", "count": 0 },
                { "type": "assert_completed", "count": 3 }
            ]
        }"#,
    );
}

#[test]
fn disabled_controller_raises_nothing() {
    assert_passes(
        r#"{
            "controller": { "kind": "thumb", "orientation": "vertical", "track_length": 300 },
            "steps": [
                { "type": "set_content", "orientation": "vertical", "extent": 300, "viewport": 100 },
                { "type": "set_enabled", "enabled": false },
                { "type": "assert_interactions_allowed", "expected": false },
                { "type": "track_pressed", "y": 250 },
                { "type": "increment" },
                { "type": "pump", "frames": 5 },
                { "type": "assert_offset", "orientation": "vertical", "value": 0 },
                { "type": "assert_completed", "count": 0 }
            ]
        }"#,
    );
}

#[test]
fn two_axis_request_completes_once() {
    assert_passes(
        r#"{
            "controller": { "kind": "bi_directional", "track_width": 200, "track_height": 200 },
            "steps": [
                { "type": "set_content", "orientation": "horizontal", "extent": 1000, "viewport": 200 },
                { "type": "set_content", "orientation": "vertical", "extent": 1000, "viewport": 200 },
                { "type": "scroll_to", "x": 400, "y": 600, "animation": "enabled" },
                { "type": "assert_pending", "count": 2 },
                { "type": "settle" },
                { "type": "assert_offset", "orientation": "horizontal", "value": 400 },
                { "type": "assert_offset", "orientation": "vertical", "value": 600 },
                { "type": "assert_completed", "count": 2, "view_changes": 1 }
            ]
        }"#,
    );
}

#[test]
fn two_axis_ids_stay_independent_without_coalescing() {
    let scenario = Scenario::from_json(
        r#"{
            "controller": { "kind": "bi_directional", "track_width": 200, "track_height": 200 },
            "steps": [
                { "type": "set_content", "orientation": "horizontal", "extent": 1000, "viewport": 200 },
                { "type": "set_content", "orientation": "vertical", "extent": 1000, "viewport": 200 },
                { "type": "scroll_to", "x": 100, "y": 100, "animation": "disabled" },
                { "type": "settle" },
                { "type": "assert_completed", "count": 2, "view_changes": 2 }
            ]
        }"#,
    )
    .unwrap();
    let config = HarnessConfig {
        surface: SurfaceConfig {
            coalesce_axes: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let outcome = run_loaded_scenario(&scenario, &config).unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn railing_locks_the_dominant_axis() {
    assert_passes(
        r#"{
            "controller": { "kind": "bi_directional", "track_width": 200, "track_height": 200 },
            "steps": [
                { "type": "set_content", "orientation": "horizontal", "extent": 400, "viewport": 200 },
                { "type": "set_content", "orientation": "vertical", "extent": 400, "viewport": 200 },
                { "type": "pointer_pressed", "device": "mouse" },
                { "type": "drag_delta", "x": 40, "y": 10 },
                { "type": "pump", "frames": 1 },
                { "type": "assert_offset", "orientation": "horizontal", "value": 80 },
                { "type": "assert_offset", "orientation": "vertical", "value": 0 },
                { "type": "drag_completed" }
            ]
        }"#,
    );
}

#[test]
fn accordion_overshoots_then_lands() {
    let spec = ControllerSpec::Thumb {
        orientation: Orientation::Vertical,
        track_length: 300.0,
        mirrored: false,
        pannable: true,
        animation_style: AnimationStyle::Accordion,
        duration_ms: None,
    };
    let mut surface = SimulatedSurface::new(SurfaceConfig::default()).unwrap();
    surface.set_content(Orientation::Vertical, 1000.0, 100.0).unwrap();
    let mut rig = Rig::build(&spec, &ControllerConfig::default()).unwrap();
    rig.attach(&surface);
    surface.push_dimensions(&mut rig).unwrap();

    rig.scroll_to(None, Some(500.0), AnimationMode::Enabled).unwrap();
    let mut peak: f64 = 0.0;
    for _ in 0..25 {
        surface.pump(&mut rig, 1).unwrap();
        peak = peak.max(surface.offset(Orientation::Vertical));
    }

    assert!(peak > 500.0, "peak={peak}");
    assert_eq!(surface.offset(Orientation::Vertical), 500.0);
    let thumb = rig.controller_mut(Orientation::Vertical).unwrap();
    assert!(thumb.pending_operations().is_empty());
}

#[test]
fn superseded_request_still_completes() {
    let spec = ControllerSpec::BiDirectional {
        track_width: 200.0,
        track_height: 200.0,
        railing: true,
    };
    let mut surface = SimulatedSurface::new(SurfaceConfig::default()).unwrap();
    for o in Orientation::ALL {
        surface.set_content(o, 1000.0, 200.0).unwrap();
    }
    let mut rig = Rig::build(&spec, &ControllerConfig::default()).unwrap();
    rig.attach(&surface);
    surface.push_dimensions(&mut rig).unwrap();

    let Rig::BiDirectional { controller, .. } = &mut rig else {
        unreachable!()
    };
    let first = surface
        .grouped(|| controller.scroll_to(Vec2::new(300.0, 300.0), AnimationMode::Enabled))
        .unwrap();
    assert_eq!(first, Reconciled::Combined(CorrelationId::from_raw(1).unwrap()));

    surface.pump(&mut rig, 3).unwrap();
    let Rig::BiDirectional { controller, .. } = &mut rig else {
        unreachable!()
    };
    surface
        .grouped(|| controller.scroll_by(Vec2::new(0.0, 50.0), AnimationMode::Disabled))
        .unwrap();
    surface.pump(&mut rig, 30).unwrap();

    assert!(surface.completions().iter().any(|c| c.cancelled));
    assert_eq!(rig.view_changes_completed(), Some(2));
    for o in Orientation::ALL {
        assert!(rig.controller(o).unwrap().pending_operations().is_empty());
    }
}
