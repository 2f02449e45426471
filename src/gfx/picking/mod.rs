//! # Pointer Picking
//!
//! Converts pointer positions into world-space rays and intersects those rays
//! with mesh geometry.
//!
//! ## How it works
//!
//! 1. **Pointer to NDC**: window pixels map to normalized device coordinates
//!    in `-1..1` on both axes, with Y flipped so the top edge is `+1`
//! 2. **NDC to Ray**: the near and far points under the pointer are
//!    unprojected through the inverse view-projection matrix
//! 3. **Ray-Mesh Intersection**: a bounding-box early out followed by an
//!    exact per-triangle test
//!
//! ```rust
//! use roomplan::gfx::picking::PointerMapper;
//!
//! let mapper = PointerMapper::new(800, 600);
//! let (x, y) = mapper.screen_to_ndc(400.0, 0.0);
//! assert_eq!((x, y), (0.0, 1.0));
//! ```

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::camera::{camera_utils::Camera, orbit_camera::OrbitCamera};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray with a normalized direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Maps the ray through an affine transform.
    ///
    /// The direction is deliberately left unnormalized: a parameter `t` found
    /// against the transformed ray addresses the same point on the original.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self {
            origin: origin.truncate() / origin.w,
            direction: direction.truncate(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB enclosing a set of points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for p in points {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection using the slab method.
    /// Returns the ray parameter of the entry point (or the exit point when
    /// the origin is inside the box).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let t0 = (self.min[axis] - ray.origin[axis]) * inv_dir[axis];
            let t1 = (self.max[axis] - ray.origin[axis]) * inv_dir[axis];
            // A ray parallel to a slab yields NaN when it grazes the plane;
            // min/max skip NaN operands.
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// Double-sided ray/triangle intersection (Möller–Trumbore).
pub fn intersect_triangle(
    ray: &Ray,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Maps window-space pointer positions to world-space rays.
///
/// Tracks the viewport size and the last pointer position so a ray can be
/// re-cast without a fresh pointer event (e.g. right after a model loads).
#[derive(Debug, Clone)]
pub struct PointerMapper {
    viewport: (f32, f32),
    last_position: Option<(f32, f32)>,
}

impl PointerMapper {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width as f32, height as f32),
            last_position: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Convert window coordinates to normalized device coordinates (-1 to 1)
    pub fn screen_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let (width, height) = self.viewport;
        if width <= 0.0 || height <= 0.0 {
            return (0.0, 0.0);
        }

        let ndc_x = (2.0 * x) / width - 1.0;
        let ndc_y = 1.0 - (2.0 * y) / height; // Flip Y axis
        (ndc_x, ndc_y)
    }

    /// Builds the world-space ray under a window position
    pub fn ray(&self, x: f32, y: f32, camera: &OrbitCamera) -> Ray {
        ndc_to_ray(self.screen_to_ndc(x, y), camera)
    }

    /// Remembers the pointer position for [`PointerMapper::last_ray`]
    pub fn record(&mut self, x: f32, y: f32) {
        self.last_position = Some((x, y));
    }

    pub fn last_position(&self) -> Option<(f32, f32)> {
        self.last_position
    }

    /// Ray under the most recently recorded pointer position
    pub fn last_ray(&self, camera: &OrbitCamera) -> Option<Ray> {
        self.last_position.map(|(x, y)| self.ray(x, y, camera))
    }
}

/// Unprojects an NDC position into a world-space ray through `camera`.
///
/// Uses the same view-projection matrix the renderer draws with, whose depth
/// range is `0..1`.
pub fn ndc_to_ray(ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
    let (ndc_x, ndc_y) = ndc;

    let view_proj = camera.build_view_projection_matrix();
    let Some(inv_view_proj) = view_proj.invert() else {
        // Degenerate camera: fall back to looking straight at the target
        return Ray::new(camera.eye, camera.target - camera.eye);
    };

    let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
    let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    let near = world_near.truncate() / world_near.w;
    let far = world_far.truncate() / world_far.w;

    Ray::new(near, far - near)
}
