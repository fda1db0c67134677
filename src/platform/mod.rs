//! Windowing seam
//!
//! The frame loop needs very little from the window system: a way to drain
//! pending events, a close flag, the held keys, the framebuffer size and
//! the display scale. [`Platform`] is that surface; [`DesktopPlatform`]
//! implements it on winit.

pub mod desktop;

use winit::keyboard::KeyCode;

pub use desktop::DesktopPlatform;

/// Keys held down right now.
pub trait KeyState {
    fn is_key_down(&self, key: KeyCode) -> bool;
}

pub trait Platform: KeyState {
    /// What [`poll_events`](Self::poll_events) yields, forwarded verbatim to
    /// the overlay.
    type Event;

    /// Processes pending window system events without blocking and returns
    /// them. Key state and the close flag are updated as a side effect.
    fn poll_events(&mut self) -> Vec<Self::Event>;

    fn should_close(&self) -> bool;

    fn request_close(&mut self);

    /// Drawable size in physical pixels. Either dimension may be zero while
    /// the window is minimized.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Display scale of the monitor the window is on, 1.0 when unknown.
    fn content_scale(&self) -> f32;
}
