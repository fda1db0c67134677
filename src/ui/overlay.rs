use crate::gfx::camera::Camera;
use crate::gfx::rendering::Renderer;
use crate::platform::Platform;
use crate::timing::FrameStats;

use super::panel::ControlPanel;

/// State the overlay may show or edit while it renders.
pub struct OverlayContext<'a> {
    pub panel: &'a mut ControlPanel,
    pub camera: &'a Camera,
    pub stats: &'a FrameStats,
}

/// UI drawn on top of the scene, in its own pass.
pub trait Overlay<P: Platform, R: Renderer> {
    /// Feeds one window event to the UI. Returns `true` when the UI
    /// captured it; camera controls are then suspended for the frame.
    fn handle_event(&mut self, platform: &P, event: &P::Event) -> bool;

    /// Whether the UI currently owns the keyboard, e.g. a text field has
    /// focus.
    fn wants_keyboard(&self) -> bool;

    /// Builds and records the UI into `frame`, after the scene pass.
    fn render(
        &mut self,
        platform: &P,
        renderer: &R,
        frame: &mut R::Frame,
        context: OverlayContext<'_>,
    );
}
