//! # Scene Management Module
//!
//! The room, the furniture placed in it and the hit-test registry that
//! pointer rays are cast against.
//!
//! ## Key Components
//!
//! - [`Scene`] - Node arena with parent links, registry and raycasts
//! - [`Room`] - Fixed floor and wall volumes built from [`RoomDimensions`]
//! - [`Mesh`] - Geometry with GPU buffers that are released explicitly
//! - [`ModelData`] - Loader output, free of GPU state
//! - [`Vertex3D`] - Position and normal vertex layout
//!
//! ## Usage
//!
//! ```rust
//! use roomplan::gfx::scene::{RoomDimensions, Scene};
//!
//! let scene = Scene::new(RoomDimensions::default());
//! assert_eq!(scene.hit_targets(), &[scene.floor()]);
//! ```

pub mod model;
pub mod object;
pub mod room;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use model::{ModelData, ModelPart};
pub use object::{DrawMesh, Mesh};
pub use room::{Room, RoomDimensions};
pub use scene::{NodeId, NodeKind, RayHit, Scene, SceneNode};
pub use vertex::Vertex3D;
