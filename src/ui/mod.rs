//! # User Interface
//!
//! A Dear ImGui debug overlay drawn after the scene pass of every frame.
//!
//! - [`Overlay`] is the seam the frame loop talks to
//! - [`UiManager`] implements it with imgui-wgpu and imgui-winit-support
//! - [`ControlPanel`] holds the editable state: clear color, model
//!   placement and the demo window toggle
//!
//! When the overlay wants the keyboard the camera controls are suspended
//! for that frame.

pub mod manager;
pub mod overlay;
pub mod panel;

pub use manager::UiManager;
pub use overlay::{Overlay, OverlayContext};
pub use panel::ControlPanel;
