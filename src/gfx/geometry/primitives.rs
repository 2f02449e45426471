//! # Primitive Shape Generation
//!
//! Axis-aligned boxes with per-face normals.

use cgmath::Vector3;

use super::GeometryData;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes, four vertices
/// per face so every face gets a flat outward normal.
pub fn generate_cube() -> GeometryData {
    #[rustfmt::skip]
    let positions = [
        // Front face (+Z)
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face (-Z)
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face (-X)
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face (+X)
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face (+Y)
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face (-Y)
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    // Two triangles per face, counter-clockwise seen from outside
    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    GeometryData {
        vertices: positions.to_vec(),
        normals,
        indices,
    }
}

/// Generate a box of the given extents centered at the origin
pub fn generate_box(size: Vector3<f32>) -> GeometryData {
    let mut data = generate_cube();
    for vertex in &mut data.vertices {
        vertex[0] *= size.x;
        vertex[1] *= size.y;
        vertex[2] *= size.z;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.normals.len(), cube.vertices.len());
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertex_count()));
    }

    #[test]
    fn test_box_extents() {
        let slab = generate_box(Vector3::new(500.0, 5.0, 400.0));
        let max_x = slab.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        let min_y = slab.vertices.iter().map(|v| v[1]).fold(f32::MAX, f32::min);
        let max_z = slab.vertices.iter().map(|v| v[2]).fold(f32::MIN, f32::max);

        assert_eq!(max_x, 250.0);
        assert_eq!(min_y, -2.5);
        assert_eq!(max_z, 200.0);
    }

    #[test]
    fn test_top_face_normals_point_up() {
        let cube = generate_cube();
        for i in 16..20 {
            assert_eq!(cube.normals[i], [0.0, 1.0, 0.0]);
            assert_eq!(cube.vertices[i][1], 0.5);
        }
    }
}
