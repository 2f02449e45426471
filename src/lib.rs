// src/lib.rs
//! Room Planner
//!
//! An interactive 3D room built on wgpu and winit. Furniture models are
//! loaded from OBJ files, follow the pointer across the floor, and are
//! placed, picked up again, rotated or deleted with the mouse and keyboard.

pub mod app;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod gfx;
pub mod placement;
pub mod planner;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::RoomPlanApp;
pub use config::RoomPlanConfig;
pub use error::{AppError, LoadError, RenderError};
pub use planner::{PlannerStatus, RoomPlanner};

/// Runs the room planner with `config` until the window closes
pub fn run(config: RoomPlanConfig) -> Result<(), AppError> {
    RoomPlanApp::new(config).run()
}
