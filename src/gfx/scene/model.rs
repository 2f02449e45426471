//! CPU-side model description handed from loaders to the scene.
//!
//! Plain vectors only, so a model can be built on a worker thread and moved
//! to the event thread before any GPU resource exists.

use super::object::Mesh;

/// One sub-mesh of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    pub name: String,
    /// Flat `[x, y, z, ...]` positions
    pub positions: Vec<f32>,
    /// Flat normals; may be empty, in which case they are computed
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub color: [f32; 4],
}

impl ModelPart {
    pub fn into_mesh(self) -> Mesh {
        Mesh::new(&self.positions, &self.normals, self.indices, self.color)
    }
}

/// A complete placeable model: a name and its sub-meshes
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub parts: Vec<ModelPart>,
}

impl ModelData {
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.indices.len() / 3).sum()
    }
}
