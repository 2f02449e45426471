use cgmath::{Matrix4, SquareMatrix};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// The orbit camera together with the controls that move it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Advances control damping and refreshes the GPU uniform
    pub fn update(&mut self) {
        self.controller.update(&mut self.camera);
        self.camera.update_view_proj();
    }

    pub fn orbit_enabled(&self) -> bool {
        self.controller.enabled
    }

    pub fn set_orbit_enabled(&mut self, enabled: bool) {
        if self.controller.enabled != enabled {
            log::debug!("Orbit controls {}", if enabled { "enabled" } else { "disabled" });
        }
        self.controller.set_enabled(enabled);
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
