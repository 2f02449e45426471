//! Integration tests for the placement loop driven through `RoomPlanner`
//!
//! Models come from an in-memory source loaded inline, so every test is
//! deterministic and needs no GPU or window. Pointer coordinates are screen
//! pixels in an 800x600 viewport looking at the default room.

use std::path::Path;

use cgmath::{InnerSpace, Vector3};
use roomplan::{
    frame_loop::FrameLoop,
    gfx::{
        geometry::generate_box,
        scene::{ModelData, ModelPart, NodeKind},
    },
    placement::{
        ClickOutcome, LoadMode, ModelLoader, ModelSource, PlacementCommand, PlacementPhase,
    },
    LoadError, RoomPlanConfig, RoomPlanner,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// A stool: a 40 x 40 cm seat on a thin post standing on y = 0
struct StoolSource;

fn box_part(name: &str, size: Vector3<f32>, lift: f32) -> ModelPart {
    let data = generate_box(size);
    ModelPart {
        name: name.to_string(),
        positions: data
            .vertices
            .iter()
            .flat_map(|v| [v[0], v[1] + lift, v[2]])
            .collect(),
        normals: Vec::new(),
        indices: data.indices,
        color: [0.6, 0.4, 0.2, 1.0],
    }
}

impl ModelSource for StoolSource {
    fn load(&self, path: &Path) -> Result<ModelData, LoadError> {
        if path.extension().is_some_and(|ext| ext == "broken") {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                reason: "unexpected end of file".to_string(),
            });
        }
        Ok(ModelData {
            name: "stool".to_string(),
            parts: vec![
                box_part("post", Vector3::new(6.0, 30.0, 6.0), 15.0),
                box_part("seat", Vector3::new(40.0, 10.0, 40.0), 35.0),
            ],
        })
    }
}

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Pixels that land on the floor, spread across the room
const LEFT: (f32, f32) = (220.0, 500.0);
const CENTER: (f32, f32) = (400.0, 500.0);
const RIGHT: (f32, f32) = (580.0, 500.0);

fn planner() -> RoomPlanner {
    RoomPlanner::new(
        &RoomPlanConfig::default(),
        ModelLoader::new(StoolSource, LoadMode::Inline),
        WIDTH,
        HEIGHT,
    )
}

fn run_frame(planner: &mut RoomPlanner, frames: &mut FrameLoop) {
    let tick = frames.tick().expect("frame loop is running");
    planner.tick(tick);
}

/// World point where the pixel's ray meets the floor
fn floor_point(planner: &RoomPlanner, (x, y): (f32, f32)) -> Vector3<f32> {
    let ray = planner.pointer().ray(x, y, &planner.camera().camera);
    let floor = planner.scene().floor();
    planner
        .scene()
        .raycast_registry(&ray)
        .into_iter()
        .find(|hit| hit.node == floor)
        .expect("pixel should be over the floor")
        .point
}

/// Loads a stool under `at`, then commits it there
fn place_stool(
    planner: &mut RoomPlanner,
    frames: &mut FrameLoop,
    (x, y): (f32, f32),
) -> roomplan::gfx::scene::NodeId {
    planner.pointer_moved(x, y);
    assert!(planner.request_load("stool.obj"));
    run_frame(planner, frames);

    let object = planner.in_flight().expect("load should finish inline");
    assert!(!planner.orbit_enabled());

    let target = floor_point(planner, (x, y));
    assert_near(planner.scene().position(object).unwrap(), target);

    match planner.click(x, y) {
        ClickOutcome::Committed(committed) => assert_eq!(committed, object),
        other => panic!("expected commit, got {:?}", other),
    }
    assert!(planner.orbit_enabled());
    assert!(planner.scene().is_registered(object));
    assert_near(planner.scene().position(object).unwrap(), target);
    object
}

fn assert_near(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < 1e-2,
        "{:?} is not at {:?}",
        actual,
        expected
    );
}

// ============================================================================
// PLACEMENT WORKFLOW TESTS
// ============================================================================

#[test]
fn test_integration_place_several_objects() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    let placed: Vec<_> = [LEFT, CENTER, RIGHT]
        .into_iter()
        .map(|at| place_stool(&mut planner, &mut frames, at))
        .collect();

    let scene = planner.scene();
    assert_eq!(scene.settled_objects().count(), 3);
    // Floor plus the three stools
    assert_eq!(scene.hit_targets().len(), 4);

    for (object, at) in placed.iter().zip([LEFT, CENTER, RIGHT]) {
        assert!(scene.is_registered(*object));
        assert_eq!(scene.node(*object).unwrap().kind, NodeKind::Placeable);
        assert_near(scene.position(*object).unwrap(), floor_point(&planner, at));
    }

    // Each stool stands where its pixel met the floor, well apart
    let xs: Vec<f32> = placed
        .iter()
        .map(|object| scene.position(*object).unwrap().x)
        .collect();
    assert!(xs[0] < -50.0 && xs[1].abs() < 1.0 && xs[2] > 50.0);
    assert!(xs.iter().all(|x| x.abs() < 250.0));

    let status = planner.status();
    assert_eq!(status.state, PlacementPhase::Idle);
    assert_eq!(status.settled, 3);
    assert_eq!(status.in_flight, None);
}

#[test]
fn test_integration_object_follows_pointer_across_floor() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    planner.pointer_moved(CENTER.0, CENTER.1);
    planner.request_load("stool.obj");
    run_frame(&mut planner, &mut frames);
    let object = planner.in_flight().unwrap();

    let expected = floor_point(&planner, CENTER);
    let position = planner.scene().position(object).unwrap();
    assert!((position - expected).magnitude() < 1e-2);

    planner.pointer_moved(LEFT.0, LEFT.1);
    let expected = floor_point(&planner, LEFT);
    let position = planner.scene().position(object).unwrap();
    assert!((position - expected).magnitude() < 1e-2);
    assert!(position.x < 0.0);
}

#[test]
fn test_integration_reselect_by_clicking_a_part() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    let stool = place_stool(&mut planner, &mut frames, CENTER);
    let before = planner.scene().position(stool).unwrap();

    // The pixel that placed the stool now looks at its post
    match planner.click(CENTER.0, CENTER.1) {
        ClickOutcome::Selected(selected) => assert_eq!(selected, stool),
        other => panic!("expected selection, got {:?}", other),
    }
    assert!(!planner.scene().is_registered(stool));
    assert!(!planner.orbit_enabled());
    assert_eq!(planner.scene().settled_objects().count(), 0);

    // Move and drop it somewhere else
    planner.pointer_moved(RIGHT.0, RIGHT.1);
    assert!(matches!(
        planner.click(RIGHT.0, RIGHT.1),
        ClickOutcome::Committed(_)
    ));
    let after = planner.scene().position(stool).unwrap();
    assert!(after.x > before.x + 50.0);
    assert!(planner.scene().is_registered(stool));
}

#[test]
fn test_integration_click_on_empty_floor_is_ignored() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();
    place_stool(&mut planner, &mut frames, LEFT);

    assert_eq!(planner.click(RIGHT.0, RIGHT.1), ClickOutcome::Ignored);
    assert_eq!(planner.status().state, PlacementPhase::Idle);
    assert!(planner.orbit_enabled());
}

#[test]
fn test_integration_four_rotations_restore_heading() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    planner.pointer_moved(CENTER.0, CENTER.1);
    planner.request_load("stool.obj");
    run_frame(&mut planner, &mut frames);
    let object = planner.in_flight().unwrap();

    for turn in 1..=4 {
        assert!(planner.command(PlacementCommand::Rotate));
        let yaw = planner.scene().yaw(object).unwrap().0;
        assert!((0.0..std::f32::consts::TAU).contains(&yaw), "turn {}", turn);
    }

    let yaw = planner.scene().yaw(object).unwrap().0;
    assert!(yaw.sin().abs() < 1e-4);
    assert!(yaw.cos() > 0.9999);
}

#[test]
fn test_integration_commands_need_an_object_in_flight() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();
    let stool = place_stool(&mut planner, &mut frames, CENTER);

    assert!(!planner.command(PlacementCommand::Rotate));
    assert!(!planner.command(PlacementCommand::Delete));
    assert!(planner.scene().contains(stool));
}

#[test]
fn test_integration_delete_in_flight_object() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    let kept = place_stool(&mut planner, &mut frames, LEFT);
    let targets_before = planner.scene().hit_targets().to_vec();
    let nodes_before = planner.scene().node_count();

    planner.pointer_moved(RIGHT.0, RIGHT.1);
    planner.request_load("stool.obj");
    run_frame(&mut planner, &mut frames);
    let doomed = planner.in_flight().unwrap();

    assert!(planner.command(PlacementCommand::Delete));
    assert!(!planner.scene().contains(doomed));
    assert_eq!(planner.scene().hit_targets(), targets_before.as_slice());
    assert_eq!(planner.scene().node_count(), nodes_before);
    assert!(planner.scene().contains(kept));
    assert!(planner.orbit_enabled());
    assert_eq!(planner.status().state, PlacementPhase::Idle);
}

#[test]
fn test_integration_delete_after_reselect() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    let stool = place_stool(&mut planner, &mut frames, CENTER);
    assert!(matches!(
        planner.click(CENTER.0, CENTER.1),
        ClickOutcome::Selected(_)
    ));
    assert!(planner.command(PlacementCommand::Delete));

    assert!(!planner.scene().contains(stool));
    assert_eq!(planner.scene().hit_targets(), &[planner.scene().floor()]);
}

// ============================================================================
// LOADING TESTS
// ============================================================================

#[test]
fn test_integration_failed_load_returns_to_idle() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();
    let nodes_before = planner.scene().node_count();

    assert!(planner.request_load("sofa.broken"));
    run_frame(&mut planner, &mut frames);

    let status = planner.status();
    assert_eq!(status.state, PlacementPhase::Idle);
    assert!(status.last_error.unwrap().contains("sofa.broken"));
    assert_eq!(planner.scene().node_count(), nodes_before);
    assert!(planner.orbit_enabled());

    // A later load clears the error
    place_stool(&mut planner, &mut frames, CENTER);
    assert_eq!(planner.status().last_error, None);
}

#[test]
fn test_integration_second_load_ignored_while_busy() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();

    planner.pointer_moved(CENTER.0, CENTER.1);
    assert!(planner.request_load("stool.obj"));
    assert!(!planner.request_load("stool.obj"));
    assert_eq!(planner.click(CENTER.0, CENTER.1), ClickOutcome::Ignored);

    run_frame(&mut planner, &mut frames);
    assert!(planner.in_flight().is_some());
    assert!(!planner.request_load("stool.obj"));

    assert!(matches!(
        planner.click(CENTER.0, CENTER.1),
        ClickOutcome::Committed(_)
    ));
    // Only one object reached the scene
    assert_eq!(planner.status().settled, 1);
}

#[test]
fn test_integration_cancelled_frame_loop_stops_ticking() {
    let mut planner = planner();
    let mut frames = FrameLoop::new();
    run_frame(&mut planner, &mut frames);

    frames.cancel_handle().cancel();
    assert!(frames.tick().is_none());
    assert_eq!(frames.frames_produced(), 1);
}
