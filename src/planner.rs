//! # Room Planner
//!
//! Application state for the placement loop, independent of any window or
//! GPU. The window shell forwards input here and renders [`RoomPlanner::scene`]
//! from [`RoomPlanner::camera`]; tests drive the same methods directly.

use std::path::PathBuf;

use cgmath::{Deg, Rad};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use crate::{
    config::{CameraConfig, CatalogEntry, RoomPlanConfig},
    frame_loop::FrameTick,
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        picking::PointerMapper,
        scene::{NodeId, Room, Scene},
    },
    placement::{ClickOutcome, ModelLoader, PlacementCommand, PlacementController, PlacementPhase},
};

/// Snapshot of the interaction state for the status panel
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerStatus {
    pub state: PlacementPhase,
    pub settled: usize,
    pub in_flight: Option<String>,
    pub last_error: Option<String>,
}

pub struct RoomPlanner {
    scene: Scene,
    camera: CameraManager,
    controller: PlacementController,
    loader: ModelLoader,
    pointer: PointerMapper,
    catalog: Vec<CatalogEntry>,
}

impl RoomPlanner {
    pub fn new(config: &RoomPlanConfig, loader: ModelLoader, width: u32, height: u32) -> Self {
        let scene = Scene::new(config.room);
        let camera = build_camera(scene.room(), &config.camera, width, height);

        Self {
            scene,
            camera,
            controller: PlacementController::new(),
            loader,
            pointer: PointerMapper::new(width, height),
            catalog: config.catalog.clone(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &CameraManager {
        &self.camera
    }

    pub fn controller(&self) -> &PlacementController {
        &self.controller
    }

    pub fn pointer(&self) -> &PointerMapper {
        &self.pointer
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn in_flight(&self) -> Option<NodeId> {
        self.controller.in_flight()
    }

    pub fn orbit_enabled(&self) -> bool {
        self.camera.orbit_enabled()
    }

    pub fn request_load(&mut self, path: impl Into<PathBuf>) -> bool {
        let started = self.controller.request_load(&self.loader, path);
        self.sync_orbit();
        started
    }

    /// Loads the catalog entry at `index`
    pub fn request_catalog(&mut self, index: usize) -> bool {
        match self.catalog.get(index) {
            Some(entry) => {
                let path = entry.path.clone();
                self.request_load(path)
            }
            None => {
                log::warn!("No catalog entry {}", index);
                false
            }
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.record(x, y);
        self.camera
            .controller
            .process_cursor_moved(x as f64, y as f64);

        if self.controller.in_flight().is_some() {
            let ray = self.pointer.ray(x, y, &self.camera.camera);
            self.controller.follow_pointer(&mut self.scene, &ray);
        }
    }

    /// A press and release of the primary button without dragging
    pub fn click(&mut self, x: f32, y: f32) -> ClickOutcome {
        self.pointer.record(x, y);
        let ray = self.pointer.ray(x, y, &self.camera.camera);
        let outcome = self.controller.click(&mut self.scene, &ray);
        self.sync_orbit();
        outcome
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.camera.controller.process_mouse_button(button, state);
    }

    pub fn scroll(&mut self, delta: &MouseScrollDelta) {
        self.camera
            .controller
            .process_scroll(delta, &mut self.camera.camera);
    }

    pub fn command(&mut self, command: PlacementCommand) -> bool {
        let applied = match command {
            PlacementCommand::Rotate => self.controller.rotate(&mut self.scene),
            PlacementCommand::Delete => self.controller.delete(&mut self.scene).is_some(),
        };
        self.sync_orbit();
        applied
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pointer.resize(width, height);
        self.camera.camera.resize_projection(width, height);
    }

    /// Per-frame work: collect finished loads, then advance the camera
    pub fn tick(&mut self, tick: FrameTick) {
        let pointer_ray = self.pointer.last_ray(&self.camera.camera);
        if let Some(object) = self.controller.poll(&mut self.scene, pointer_ray.as_ref()) {
            log::debug!("Frame {}: {:?} is now in flight", tick.index, object);
        }
        self.sync_orbit();
        self.camera.update();
    }

    pub fn status(&self) -> PlannerStatus {
        PlannerStatus {
            state: self.controller.state().phase(),
            settled: self.scene.settled_objects().count(),
            in_flight: self
                .controller
                .in_flight()
                .and_then(|id| self.scene.node(id))
                .map(|node| node.name.clone()),
            last_error: self.controller.last_error().map(|err| err.to_string()),
        }
    }

    fn sync_orbit(&mut self) {
        self.camera
            .set_orbit_enabled(self.controller.orbit_enabled());
    }
}

fn build_camera(room: &Room, config: &CameraConfig, width: u32, height: u32) -> CameraManager {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let mut camera = OrbitCamera::looking_at(room.default_eye(), room.orbit_target(), aspect);
    camera.fovy = Rad::from(Deg(config.fov_degrees));
    camera.znear = config.near;
    camera.zfar = config.far;
    camera.bounds.min_distance = Some(config.min_distance);
    camera.bounds.max_distance = Some(config.max_distance);
    camera.set_max_polar_angle(config.max_polar_angle);
    camera.update_view_proj();

    let controller =
        CameraController::new(config.rotate_speed, config.zoom_speed).with_damping(config.damping);

    CameraManager::new(camera, controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LoadError,
        gfx::scene::ModelData,
        placement::{LoadMode, ModelSource},
    };
    use std::path::Path;

    struct NoModels;

    impl ModelSource for NoModels {
        fn load(&self, path: &Path) -> Result<ModelData, LoadError> {
            Err(LoadError::NotFound(path.display().to_string()))
        }
    }

    fn planner() -> RoomPlanner {
        RoomPlanner::new(
            &RoomPlanConfig::default(),
            ModelLoader::new(NoModels, LoadMode::Inline),
            800,
            600,
        )
    }

    #[test]
    fn test_camera_starts_at_room_corner_view() {
        let planner = planner();
        let camera = &planner.camera().camera;

        assert_eq!(camera.target, cgmath::Vector3::new(0.0, 125.0, 0.0));
        assert!((camera.eye.y - 375.0).abs() < 1e-2);
        assert!((camera.eye.z - 600.0).abs() < 1e-2);
        assert!(planner.orbit_enabled());
    }

    #[test]
    fn test_failed_catalog_load_reports_error() {
        let mut planner = planner();
        assert!(planner.request_catalog(0));
        assert_eq!(planner.status().state, PlacementPhase::Loading);

        planner.tick(FrameTick {
            index: 0,
            delta: Default::default(),
        });

        let status = planner.status();
        assert_eq!(status.state, PlacementPhase::Idle);
        assert!(status.last_error.unwrap().contains("chair.obj"));
        assert!(planner.orbit_enabled());
    }

    #[test]
    fn test_unknown_catalog_index() {
        let mut planner = planner();
        assert!(!planner.request_catalog(10));
        assert_eq!(planner.status().state, PlacementPhase::Idle);
    }

    #[test]
    fn test_resize_updates_viewport_and_aspect() {
        let mut planner = planner();
        planner.resize(1000, 500);
        assert_eq!(planner.pointer().viewport(), (1000.0, 500.0));
        assert_eq!(planner.camera().camera.aspect, 2.0);

        planner.resize(0, 0);
        assert_eq!(planner.pointer().viewport(), (1000.0, 500.0));
    }
}
