//! Debug control panel
//!
//! The panel's state is plain data so the frame loop can apply it without
//! an imgui context; [`ControlPanel::build`] is the only part that draws.

use cgmath::Vector3;

use crate::gfx::camera::Camera;
use crate::gfx::transform::Transform;
use crate::timing::FrameStats;

pub const PANEL_TITLE: &str = "My Application Controls";

#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub show_demo_window: bool,
    pub clear_color: [f32; 4],
    pub model_position: [f32; 3],
    /// Euler degrees
    pub model_rotation: [f32; 3],
    pub model_scale: f32,
}

impl ControlPanel {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            show_demo_window: false,
            clear_color,
            model_position: [0.0; 3],
            model_rotation: [0.0; 3],
            model_scale: 1.0,
        }
    }

    /// Copies the edited placement into `transform`. The matrix itself is
    /// rebuilt on the transform's next update.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.set_position(Vector3::from(self.model_position));
        transform.set_rotation(Vector3::from(self.model_rotation));
        transform.set_uniform_scale(self.model_scale);
    }

    pub fn reset_transform(&mut self) {
        self.model_position = [0.0; 3];
        self.model_rotation = [0.0; 3];
        self.model_scale = 1.0;
    }

    pub fn build(&mut self, ui: &imgui::Ui, camera: &Camera, stats: &FrameStats) {
        let display_size = ui.io().display_size;
        // Guard against invalid display size
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return;
        }

        ui.window(PANEL_TITLE)
            .position([20.0, 20.0], imgui::Condition::FirstUseEver)
            .size([380.0, 0.0], imgui::Condition::FirstUseEver)
            .collapsible(true)
            .build(|| {
                ui.text(format!(
                    "{:.1} FPS ({:.2} ms)",
                    stats.fps(),
                    stats.frame_time_ms()
                ));
                ui.checkbox("Show demo window", &mut self.show_demo_window);
                ui.color_edit4("Clear color", &mut self.clear_color);

                ui.separator();
                ui.text("Model");
                ui.slider("Position X", -10.0, 10.0, &mut self.model_position[0]);
                ui.slider("Position Y", -10.0, 10.0, &mut self.model_position[1]);
                ui.slider("Position Z", -10.0, 10.0, &mut self.model_position[2]);
                ui.slider("Rotation X", -180.0, 180.0, &mut self.model_rotation[0]);
                ui.slider("Rotation Y", -180.0, 180.0, &mut self.model_rotation[1]);
                ui.slider("Rotation Z", -180.0, 180.0, &mut self.model_rotation[2]);
                ui.slider("Scale", 0.1, 5.0, &mut self.model_scale);
                if ui.button("Reset") {
                    self.reset_transform();
                }

                ui.separator();
                let position = camera.position();
                ui.text("Camera");
                ui.text(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    position.x, position.y, position.z
                ));
                ui.text(format!(
                    "Yaw {:.1}  Pitch {:.1}  FOV {:.1}",
                    camera.yaw(),
                    camera.pitch(),
                    camera.fov()
                ));
                ui.text("WASD/QE move, arrows look, =/- zoom, Esc quits");
            });

        if self.show_demo_window {
            ui.show_demo_window(&mut self.show_demo_window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    fn test_default_panel_leaves_identity() {
        let panel = ControlPanel::new([0.1, 0.1, 0.1, 1.0]);
        let mut transform = Transform::new();
        panel.apply_to(&mut transform);
        transform.update(0.0);
        assert_eq!(transform.model_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_apply_to_sets_fields_without_update() {
        let mut panel = ControlPanel::new([0.0; 4]);
        panel.model_position = [1.0, 2.0, 3.0];
        panel.model_rotation = [0.0, 45.0, 0.0];
        panel.model_scale = 2.0;

        let mut transform = Transform::new();
        panel.apply_to(&mut transform);

        assert_eq!(transform.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation(), Vector3::new(0.0, 45.0, 0.0));
        assert_eq!(transform.scale(), Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(transform.model_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_reset_transform() {
        let mut panel = ControlPanel::new([0.0; 4]);
        panel.model_position = [5.0; 3];
        panel.model_scale = 0.5;
        panel.show_demo_window = true;

        panel.reset_transform();

        assert_eq!(panel.model_position, [0.0; 3]);
        assert_eq!(panel.model_scale, 1.0);
        assert!(panel.show_demo_window);
    }
}
