//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by the room volumes and loaded
//! furniture meshes.

/// A 3D vertex with position and normal data.
///
/// `#[repr(C)]` keeps the layout identical to the `VertexInput` struct in
/// `room.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Position in the mesh's local space
    pub position: [f32; 3],
    /// Unit normal used for lambert shading
    pub normal: [f32; 3],
}

impl Vertex3D {
    /// Builds a vertex from index `i` of flat position/normal arrays
    /// (`[x0, y0, z0, x1, ...]`), the layout produced by OBJ loaders.
    pub fn from_flat(positions: &[f32], normals: &[f32], i: usize) -> Self {
        Self {
            position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
            normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
        }
    }

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
