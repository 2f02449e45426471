//! Global uniform bindings for camera and light data
//!
//! One uniform buffer shared by every draw in a frame, bound to slot 0 of
//! the room pipeline.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content.
/// MUST match the `Globals` struct in `room.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Normalized direction towards the light, `w` unused
    light_direction: [f32; 4],
    /// Ambient intensity in `x`, directional intensity in `y`
    light_intensity: [f32; 4],
}

/// Ambient light plus one directional light
#[derive(Copy, Clone, Debug)]
pub struct LightConfig {
    pub position: Vector3<f32>,
    pub ambient: f32,
    pub directional: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(100.0, 300.0, 200.0),
            ambient: 0.6,
            directional: 0.8,
        }
    }
}

impl LightConfig {
    fn direction(&self) -> Vector3<f32> {
        if self.position.magnitude2() > 0.0 {
            self.position.normalize()
        } else {
            Vector3::unit_y()
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Builds the per-frame uniform content from the camera and light
pub fn global_content(camera: CameraUniform, light: &LightConfig) -> GlobalUBOContent {
    GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_direction: light.direction().extend(0.0).into(),
        light_intensity: [light.ambient, light.directional, 0.0, 0.0],
    }
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    light: LightConfig,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let light = LightConfig::default();
        let ubo = GlobalUBO::new(device, &global_content(CameraUniform::default(), &light));
        let bind_group_layout = binding_types::single_uniform_layout(device, "Globals Bind Group");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            ubo,
            bind_group_layout,
            bind_group,
            light,
        }
    }

    /// Should be called once per frame with the current camera
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform) {
        let content = global_content(camera, &self.light);
        self.ubo.write(queue, &content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_light_direction_normalized() {
        let content = global_content(CameraUniform::default(), &LightConfig::default());
        let [x, y, z, w] = content.light_direction;
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-6);
        assert_eq!(w, 0.0);
        assert_eq!(content.light_intensity[0], 0.6);
        assert_eq!(content.light_intensity[1], 0.8);
    }
}
