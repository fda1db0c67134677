use winit::keyboard::KeyCode;

use super::fly_camera::Camera;
use crate::platform::KeyState;

/// Units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;
/// Degrees per second.
pub const DEFAULT_TURN_SPEED: f32 = 90.0;
/// Degrees of field of view per second.
pub const DEFAULT_ZOOM_SPEED: f32 = 30.0;

/// Keyboard fly controls, sampled once per frame.
///
/// | keys      | action             |
/// |-----------|--------------------|
/// | W / S     | forward / back     |
/// | D / A     | right / left       |
/// | E / Q     | up / down          |
/// | arrows    | yaw and pitch      |
/// | `=` / `-` | zoom in / zoom out |
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    pub move_speed: f32,
    pub turn_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_SPEED, DEFAULT_TURN_SPEED)
    }
}

impl CameraController {
    pub fn new(move_speed: f32, turn_speed: f32) -> Self {
        Self {
            move_speed,
            turn_speed,
            zoom_speed: DEFAULT_ZOOM_SPEED,
        }
    }

    /// Applies whatever keys are held right now, scaled by `delta_time`.
    ///
    /// Returns `true` when the camera was touched.
    pub fn apply(&self, keys: &impl KeyState, camera: &mut Camera, delta_time: f32) -> bool {
        let axis = |positive: KeyCode, negative: KeyCode| -> f32 {
            let mut value = 0.0;
            if keys.is_key_down(positive) {
                value += 1.0;
            }
            if keys.is_key_down(negative) {
                value -= 1.0;
            }
            value
        };

        let forward = axis(KeyCode::KeyW, KeyCode::KeyS);
        let right = axis(KeyCode::KeyD, KeyCode::KeyA);
        let up = axis(KeyCode::KeyE, KeyCode::KeyQ);
        let yaw = axis(KeyCode::ArrowRight, KeyCode::ArrowLeft);
        let pitch = axis(KeyCode::ArrowUp, KeyCode::ArrowDown);
        // Zooming in narrows the field of view
        let zoom = axis(KeyCode::Minus, KeyCode::Equal);

        let step = self.move_speed * delta_time;
        let turn = self.turn_speed * delta_time;
        let mut changed = false;

        if forward != 0.0 {
            camera.move_forward(forward * step);
            changed = true;
        }
        if right != 0.0 {
            camera.move_right(right * step);
            changed = true;
        }
        if up != 0.0 {
            camera.move_up(up * step);
            changed = true;
        }
        if yaw != 0.0 || pitch != 0.0 {
            camera.rotate(yaw * turn, pitch * turn);
            changed = true;
        }
        if zoom != 0.0 {
            camera.zoom(zoom * self.zoom_speed * delta_time);
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};
    use std::collections::HashSet;

    struct HeldKeys(HashSet<KeyCode>);

    impl HeldKeys {
        fn of(keys: &[KeyCode]) -> Self {
            Self(keys.iter().copied().collect())
        }
    }

    impl KeyState for HeldKeys {
        fn is_key_down(&self, key: KeyCode) -> bool {
            self.0.contains(&key)
        }
    }

    #[test]
    fn test_no_keys_leaves_camera_alone() {
        let controller = CameraController::default();
        let mut camera = Camera::default();
        let before = camera;

        assert!(!controller.apply(&HeldKeys::of(&[]), &mut camera, 0.5));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_forward_scales_with_delta_time() {
        let controller = CameraController::default();
        let mut camera = Camera::default();

        assert!(controller.apply(&HeldKeys::of(&[KeyCode::KeyW]), &mut camera, 2.0));

        // Default camera looks down -Z
        let expected = Vector3::new(0.0, 0.0, -DEFAULT_MOVE_SPEED * 2.0);
        assert!((camera.position() - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let controller = CameraController::default();
        let mut camera = Camera::default();
        let keys = HeldKeys::of(&[KeyCode::KeyA, KeyCode::KeyD]);

        assert!(!controller.apply(&keys, &mut camera, 1.0));
        assert_eq!(camera.position(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_arrows_rotate() {
        let controller = CameraController::new(1.0, 10.0);
        let mut camera = Camera::default();

        controller.apply(&HeldKeys::of(&[KeyCode::ArrowRight]), &mut camera, 1.0);
        assert_eq!(camera.yaw(), 280.0);

        controller.apply(&HeldKeys::of(&[KeyCode::ArrowUp]), &mut camera, 0.5);
        assert_eq!(camera.pitch(), 5.0);
    }

    #[test]
    fn test_zoom_keys() {
        let controller = CameraController::default();
        let mut camera = Camera::default();

        controller.apply(&HeldKeys::of(&[KeyCode::Equal]), &mut camera, 0.5);
        assert_eq!(camera.fov(), 45.0 - DEFAULT_ZOOM_SPEED * 0.5);

        controller.apply(&HeldKeys::of(&[KeyCode::Minus]), &mut camera, 100.0);
        assert_eq!(camera.fov(), 90.0);
    }
}
