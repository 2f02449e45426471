// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Global uniforms and the depth buffer shared by every draw.

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, LightConfig};
pub use texture_resource::DepthTexture;
