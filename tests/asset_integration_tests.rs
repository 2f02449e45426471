//! Integration tests for the bundled furniture models
//!
//! Parses the OBJ/MTL files under `assets/models` with the real loader and
//! runs one through the background worker.

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use roomplan::{
    frame_loop::FrameLoop,
    gfx::picking::AABB,
    placement::{ClickOutcome, ModelSource, ObjModelSource, PlacementPhase},
    RoomPlanConfig, RoomPlanner,
};

fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_integration_default_catalog_files_exist() {
    for entry in RoomPlanConfig::default().catalog {
        let path = asset(&entry.path.to_string_lossy());
        assert!(path.is_file(), "{} missing for {}", path.display(), entry.name);
    }
}

#[test]
fn test_integration_chair_parts_and_colours() {
    let chair = ObjModelSource.load(&asset("assets/models/chair.obj")).unwrap();

    assert_eq!(chair.name, "chair");
    assert_eq!(chair.parts.len(), 6);
    // Six quads per box part
    assert_eq!(chair.triangle_count(), 6 * 12);

    let seat = chair.parts.iter().find(|p| p.name == "seat").unwrap();
    assert_eq!(seat.color, [0.20, 0.35, 0.55, 1.0]);
    let leg = chair.parts.iter().find(|p| p.name == "leg_0").unwrap();
    assert_eq!(leg.color, [0.45, 0.30, 0.18, 1.0]);
}

#[test]
fn test_integration_models_stand_on_the_floor() {
    for file in ["assets/models/chair.obj", "assets/models/table.obj"] {
        let model = ObjModelSource.load(&asset(file)).unwrap();
        let points: Vec<[f32; 3]> = model
            .parts
            .iter()
            .flat_map(|part| part.positions.chunks_exact(3))
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let bounds = AABB::from_points(&points);

        assert_eq!(bounds.min.y, 0.0, "{} does not rest on y = 0", file);
        assert!(bounds.max.y > 40.0, "{} is too small for centimetres", file);
    }
}

#[test]
fn test_integration_background_load_reaches_placing() {
    let config = RoomPlanConfig::default();
    let mut planner = RoomPlanner::new(
        &config,
        roomplan::placement::ModelLoader::obj(),
        800,
        600,
    );
    let mut frames = FrameLoop::new();

    planner.pointer_moved(400.0, 500.0);
    assert!(planner.request_load(asset("assets/models/table.obj")));

    let deadline = Instant::now() + Duration::from_secs(10);
    while planner.in_flight().is_none() {
        assert!(Instant::now() < deadline, "table never finished loading");
        assert_eq!(planner.status().last_error, None);
        planner.tick(frames.tick().unwrap());
        thread::sleep(Duration::from_millis(5));
    }

    let status = planner.status();
    assert_eq!(status.state, PlacementPhase::Placing);
    assert_eq!(status.in_flight.as_deref(), Some("table"));
    assert!(matches!(planner.click(400.0, 500.0), ClickOutcome::Committed(_)));
    assert_eq!(planner.status().settled, 1);
}
