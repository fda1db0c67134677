//! Core rendering functionality
//!
//! [`Renderer`] is the seam between the frame loop and the GPU;
//! [`RenderEngine`] is the wgpu implementation of it.

pub mod render_engine;
pub mod renderer;

// Re-export main types
pub use render_engine::{RenderEngine, RenderFrame, OPENGL_TO_WGPU_MATRIX};
pub use renderer::{DrawCall, DrawUniforms, Renderer, ScenePass};
