//! # Graphics Module
//!
//! Everything between the room model and the pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Y-up orbit camera with damped controls
//! - **Geometry** ([`geometry`]) - Procedural boxes for the floor and walls
//! - **Picking** ([`picking`]) - Pointer to ray mapping and ray/mesh tests
//! - **Rendering Pipeline** ([`rendering`]) - Single lit pipeline and frame loop body
//! - **Scene Management** ([`scene`]) - Scene graph, room and hit-test registry
//! - **Resource Management** ([`resources`]) - Global uniforms and depth buffer
//!
//! ## Usage
//!
//! ```no_run
//! use roomplan::gfx::{RenderEngine, scene::{RoomDimensions, Scene}};
//!
//! // The render engine is created by the application shell once a window exists
//! // let engine = pollster::block_on(RenderEngine::new(window, 1280, 720, true))?;
//! let scene = Scene::new(RoomDimensions::default());
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
