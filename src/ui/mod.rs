//! # User Interface Module
//!
//! Dear ImGui overlay for the room planner: the furniture catalog, the
//! placement status and the key bindings.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, plus input capture
//! - [`catalog_panel`] - The catalog window; returns a [`CatalogAction`] when
//!   the user picks an item
//!
//! While ImGui wants the pointer, clicks and drags do not reach the
//! placement loop or the orbit camera.

pub mod catalog;
pub mod manager;

// Re-export main types
pub use catalog::{catalog_panel, CatalogAction};
pub use manager::UiManager;
