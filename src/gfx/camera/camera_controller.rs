use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use super::orbit_camera::OrbitCamera;

/// Orbit controls with damping.
///
/// Drag input accumulates angular velocity; [`CameraController::update`]
/// applies a `damping` fraction of it each frame and decays the rest, so the
/// total rotation equals the input while the motion eases out. While
/// `enabled` is false all pointer input is ignored.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping: f32,
    pub enabled: bool,
    is_mouse_pressed: bool,
    last_cursor: Option<(f64, f64)>,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            damping: 0.05,
            enabled: true,
            is_mouse_pressed: false,
            last_cursor: None,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        self.is_mouse_pressed = self.enabled && state == ElementState::Pressed;
    }

    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        // Always track the cursor so re-enabling never produces a jump
        let previous = self.last_cursor.replace((x, y));

        if !self.enabled || !self.is_mouse_pressed {
            return;
        }

        if let Some((last_x, last_y)) = previous {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;
            self.yaw_velocity -= dx * self.rotate_speed;
            self.pitch_velocity += dy * self.rotate_speed;
        }
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta, camera: &mut OrbitCamera) {
        if !self.enabled {
            return;
        }

        let scroll_amount = -match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
        };
        camera.zoom(scroll_amount * self.zoom_speed);
    }

    /// Advances damping by one frame
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.damping > 0.0 {
            camera.add_yaw(self.yaw_velocity * self.damping);
            camera.add_pitch(self.pitch_velocity * self.damping);
            self.yaw_velocity *= 1.0 - self.damping;
            self.pitch_velocity *= 1.0 - self.damping;
        } else {
            camera.add_yaw(self.yaw_velocity);
            camera.add_pitch(self.pitch_velocity);
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
        }
    }

    /// Enables or disables pointer input; disabling also ends any drag
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.is_mouse_pressed = false;
        }
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(100.0, 0.5, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn test_drag_rotates_with_damping() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.5);

        controller.process_cursor_moved(0.0, 0.0);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_cursor_moved(-10.0, 0.0);

        // Half of the 0.1 rad input lands on the first frame
        controller.update(&mut camera);
        assert!((camera.yaw - 0.05).abs() < 1e-6);

        for _ in 0..60 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_controller_ignores_input() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.0);
        controller.set_enabled(false);

        controller.process_cursor_moved(0.0, 0.0);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_cursor_moved(50.0, 50.0);
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 3.0), &mut camera);
        controller.update(&mut camera);

        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.5);
        assert_eq!(camera.distance, 100.0);
        assert!(!controller.is_rotating());
    }

    #[test]
    fn test_disable_ends_drag() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_rotating());

        controller.set_enabled(false);
        controller.set_enabled(true);
        assert!(!controller.is_rotating());
    }
}
