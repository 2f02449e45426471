use cgmath::{Matrix4, Vector3};
use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::{
    geometry::GeometryData,
    picking::{intersect_triangle, Ray, AABB},
};

/// Per-mesh uniform: model matrix and flat material colour
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// GPU buffers owned by a single mesh.
///
/// These are destroyed explicitly in [`Mesh::release`] rather than left for
/// the driver to reclaim whenever the last handle drops.
pub struct MeshGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub object_buffer: wgpu::Buffer,
    pub object_bind_group: wgpu::BindGroup,
}

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    bounds: AABB,
    pub color: [f32; 4],
    gpu_resources: Option<MeshGpuResources>,
}

impl Mesh {
    /// Creates a mesh from flat OBJ-style arrays. Normals are computed from
    /// the triangles when missing or mismatched.
    pub fn new(positions: &[f32], normals: &[f32], indices: Vec<u32>, color: [f32; 4]) -> Self {
        let computed;
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            computed = Self::calculate_face_normals(positions, &indices);
            &computed
        };

        let vertices = (0..positions.len() / 3)
            .map(|i| Vertex3D::from_flat(positions, normals, i))
            .collect();

        Self::from_parts(vertices, indices, color)
    }

    pub fn from_geometry(data: &GeometryData, color: [f32; 4]) -> Self {
        Self::from_parts(data.to_vertices(), data.indices.clone(), color)
    }

    fn from_parts(vertices: Vec<Vertex3D>, indices: Vec<u32>, color: [f32; 4]) -> Self {
        let bounds = AABB::from_points(vertices.iter().map(|v| &v.position));
        Self {
            vertices,
            indices,
            bounds,
            color,
            gpu_resources: None,
        }
    }

    /// Averages adjacent face normals per vertex
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            if i0.max(i1).max(i2) >= vertex_count {
                continue;
            }

            let face_normal = (position(i1) - position(i0)).cross(position(i2) - position(i0));
            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|n| *n /= length);
            }
        }

        normals
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Intersects a ray given in this mesh's local space.
    /// Returns the parameter of the nearest triangle hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.bounds.intersect_ray(ray)?;

        let position = |i: u32| self.vertices.get(i as usize).map(|v| Vector3::from(v.position));

        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let (a, b, c) = (position(tri[0])?, position(tri[1])?, position(tri[2])?);
                intersect_triangle(ray, a, b, c)
            })
            .min_by(f32::total_cmp)
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    pub fn gpu_resources(&self) -> Option<&MeshGpuResources> {
        self.gpu_resources.as_ref()
    }

    /// Uploads geometry and creates the per-mesh uniform and bind group
    pub fn init_gpu_resources(&mut self, device: &Device, object_layout: &wgpu::BindGroupLayout) {
        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = ObjectUniform {
            model: Matrix4::from_scale(1.0).into(),
            color: self.color,
        };
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            object_buffer,
            object_bind_group,
        });
    }

    /// Writes the world transform and colour to the GPU, if uploaded
    pub fn update_uniform(&self, queue: &wgpu::Queue, model: Matrix4<f32>) {
        if let Some(gpu) = &self.gpu_resources {
            let uniform = ObjectUniform {
                model: model.into(),
                color: self.color,
            };
            queue.write_buffer(&gpu.object_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Consumes the mesh and destroys its GPU buffers.
    /// Returns whether any GPU memory was held.
    pub fn release(self) -> bool {
        match self.gpu_resources {
            Some(gpu) => {
                gpu.vertex_buffer.destroy();
                gpu.index_buffer.destroy();
                gpu.object_buffer.destroy();
                true
            }
            None => false,
        }
    }
}

/// Draw helpers for [`Mesh`]
pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let Some(gpu) = mesh.gpu_resources() else {
            return; // Skip drawing if not uploaded
        };

        self.set_bind_group(1, &gpu.object_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.indices.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn test_missing_normals_are_computed() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0];
        let mesh = Mesh::new(&positions, &[], vec![0, 1, 2], [1.0; 4]);

        for vertex in mesh.vertices() {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_mesh_ray_hits_nearest_face() {
        let mesh = Mesh::from_geometry(&generate_box(Vector3::new(2.0, 2.0, 2.0)), [1.0; 4]);
        let ray = Ray::new(Vector3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

        let t = mesh.intersect_ray(&ray).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_ray_miss() {
        let mesh = Mesh::from_geometry(&generate_box(Vector3::new(2.0, 2.0, 2.0)), [1.0; 4]);
        let ray = Ray::new(Vector3::new(5.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert!(mesh.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_release_without_gpu() {
        let mesh = Mesh::from_geometry(&generate_box(Vector3::new(1.0, 1.0, 1.0)), [1.0; 4]);
        assert!(!mesh.has_gpu_resources());
        assert!(!mesh.release());
    }
}
