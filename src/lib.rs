//! Baize
//!
//! A windowed 3D rendering skeleton on wgpu and winit: a free-flying
//! camera, a model loaded from OBJ or generated as a billiard ball, and an
//! ImGui debug overlay, stepped by a single-threaded frame loop.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod platform;
pub mod timing;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{AppState, Application};
pub use config::{AppConfig, ModelSource};
pub use error::{InitError, ModelError, ShaderError};
