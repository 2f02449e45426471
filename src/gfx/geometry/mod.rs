//! # Procedural Geometry Generation
//!
//! Generates the box volumes the room is built from, so the floor and walls
//! need no external model files.
//!
//! ```rust
//! use cgmath::Vector3;
//! use roomplan::gfx::geometry::generate_box;
//!
//! // A 500 x 5 x 400 floor slab centred on the origin
//! let floor = generate_box(Vector3::new(500.0, 5.0, 400.0));
//! assert_eq!(floor.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    /// Missing normals default to +Y.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}
