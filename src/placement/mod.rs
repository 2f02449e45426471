//! # Furniture Placement
//!
//! The object-placement interaction loop: loading models off the event
//! thread, the state machine that moves one object at a time with the
//! pointer, and the key/mouse mapping that drives it.

pub mod controller;
pub mod input;
pub mod loader;

pub use controller::{
    ClickOutcome, PlacementController, PlacementPhase, PlacementState, ROTATION_STEP,
};
pub use input::{ClickTracker, PlacementCommand};
pub use loader::{LoadMode, ModelLoader, ModelSource, ObjModelSource, PendingLoad};
