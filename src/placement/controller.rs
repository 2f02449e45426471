//! # Placement Controller
//!
//! The interaction state machine behind furniture placement.
//!
//! ```text
//!            load request              load ok
//!   Idle ─────────────────▶ Loading ─────────────▶ Placing
//!    ▲  ◀────────────────────┘ load failed           │
//!    │                                               │
//!    └────────────── click (commit) / delete ────────┘
//!    Idle ── click on a settled object ──▶ Placing
//! ```
//!
//! At most one object is in flight. The in-flight object is never in the
//! hit-test registry, and camera orbit is enabled exactly when nothing is in
//! flight.

use std::{f32::consts::FRAC_PI_2, path::PathBuf};

use cgmath::Rad;

use super::loader::{ModelLoader, PendingLoad};
use crate::{
    error::LoadError,
    gfx::{
        picking::Ray,
        scene::{model::ModelData, NodeId, Scene},
    },
};

/// Yaw added by one rotate command
pub const ROTATION_STEP: Rad<f32> = Rad(FRAC_PI_2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementState {
    Idle,
    Loading { path: PathBuf },
    Placing { object: NodeId },
}

/// [`PlacementState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    Idle,
    Loading,
    Placing,
}

impl PlacementState {
    pub fn phase(&self) -> PlacementPhase {
        match self {
            Self::Idle => PlacementPhase::Idle,
            Self::Loading { .. } => PlacementPhase::Loading,
            Self::Placing { .. } => PlacementPhase::Placing,
        }
    }
}

/// Result of a click, for logging and the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The in-flight object was settled where it stood
    Committed(NodeId),
    /// A settled object was picked up again
    Selected(NodeId),
    Ignored,
}

pub struct PlacementController {
    state: PlacementState,
    pending: Option<PendingLoad>,
    last_error: Option<LoadError>,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementController {
    pub fn new() -> Self {
        Self {
            state: PlacementState::Idle,
            pending: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn in_flight(&self) -> Option<NodeId> {
        match self.state {
            PlacementState::Placing { object } => Some(object),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PlacementState::Loading { .. })
    }

    /// Orbit is allowed whenever nothing follows the pointer
    pub fn orbit_enabled(&self) -> bool {
        self.in_flight().is_none()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    /// Starts loading a model. Ignored unless idle; returns whether a load
    /// was started.
    pub fn request_load(&mut self, loader: &ModelLoader, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.state != PlacementState::Idle {
            log::debug!("Ignoring load of {} while {:?}", path.display(), self.state);
            return false;
        }

        log::info!("Loading model {}", path.display());
        self.last_error = None;
        self.pending = Some(loader.request(path.clone()));
        self.state = PlacementState::Loading { path };
        true
    }

    /// Collects a finished load, if any. `pointer` is the ray under the last
    /// known pointer position, used to snap the new object onto the floor.
    /// Returns the new in-flight object when a load succeeded.
    pub fn poll(&mut self, scene: &mut Scene, pointer: Option<&Ray>) -> Option<NodeId> {
        let result = self.pending.as_mut()?.try_recv()?;
        self.pending = None;
        self.finish_load(scene, result, pointer)
    }

    /// Applies a load result. Only meaningful while loading.
    pub fn finish_load(
        &mut self,
        scene: &mut Scene,
        result: Result<ModelData, LoadError>,
        pointer: Option<&Ray>,
    ) -> Option<NodeId> {
        let PlacementState::Loading { path } = &self.state else {
            log::warn!("Discarding load result outside of Loading");
            return None;
        };

        match result {
            Ok(model) => {
                log::info!(
                    "Loaded {} ({} parts, {} triangles)",
                    path.display(),
                    model.parts.len(),
                    model.triangle_count()
                );
                let object = scene.insert_model(model);
                self.state = PlacementState::Placing { object };
                if let Some(ray) = pointer {
                    self.follow_pointer(scene, ray);
                }
                Some(object)
            }
            Err(err) => {
                log::warn!("Failed to load {}: {}", path.display(), err);
                self.last_error = Some(err);
                self.state = PlacementState::Idle;
                None
            }
        }
    }

    /// Moves the in-flight object to the nearest floor hit of `ray`.
    /// Returns false when nothing moved.
    pub fn follow_pointer(&mut self, scene: &mut Scene, ray: &Ray) -> bool {
        let Some(object) = self.in_flight() else {
            return false;
        };

        let floor = scene.floor();
        let floor_hit = scene
            .raycast_registry(ray)
            .into_iter()
            .find(|hit| hit.node == floor);

        match floor_hit {
            Some(hit) => scene.set_position(object, hit.point),
            None => false,
        }
    }

    pub fn click(&mut self, scene: &mut Scene, ray: &Ray) -> ClickOutcome {
        match self.state {
            PlacementState::Placing { object } => {
                scene.register(object);
                self.state = PlacementState::Idle;
                log::debug!("Committed {:?}", object);
                ClickOutcome::Committed(object)
            }
            PlacementState::Idle => {
                let selected = scene
                    .raycast_all(ray)
                    .iter()
                    .find_map(|hit| scene.owner_of(hit.node));

                match selected {
                    Some(object) => {
                        scene.unregister(object);
                        self.state = PlacementState::Placing { object };
                        log::debug!("Selected {:?}", object);
                        ClickOutcome::Selected(object)
                    }
                    None => ClickOutcome::Ignored,
                }
            }
            PlacementState::Loading { .. } => ClickOutcome::Ignored,
        }
    }

    /// Quarter turn of the in-flight object
    pub fn rotate(&mut self, scene: &mut Scene) -> bool {
        self.in_flight()
            .and_then(|object| scene.rotate_yaw(object, ROTATION_STEP))
            .is_some()
    }

    /// Removes the in-flight object from the scene. Returns the number of
    /// meshes released.
    pub fn delete(&mut self, scene: &mut Scene) -> Option<usize> {
        let object = self.in_flight()?;
        self.state = PlacementState::Idle;
        let released = scene.remove_object(object);
        log::debug!("Deleted {:?}, released {:?} meshes", object, released);
        released
    }
}
