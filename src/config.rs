//! Start-up configuration
//!
//! Everything here is fixed once the [`Application`](crate::app::Application)
//! is constructed. There is no config file; `main` fills an [`AppConfig`]
//! from command-line flags and leaves the rest at their defaults.

use std::path::PathBuf;

use crate::gfx::resources::shader::{ShaderConfig, StageSource};
use crate::gfx::scene::Light;

pub const DEFAULT_MODEL_PATH: &str = "assets/geometry/cube.obj";
pub const DEFAULT_VERTEX_SHADER: &str = "shaders/model.vert.wgsl";
pub const DEFAULT_FRAGMENT_SHADER: &str = "shaders/model.frag.wgsl";

/// Regulation pool ball radius in metres.
pub const BALL_RADIUS: f32 = 0.028575;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Present with `Fifo` when set, `AutoNoVsync` otherwise.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Billiards Simulation".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub near: f32,
    pub far: f32,
    /// Initial world-space position
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 3.0],
        }
    }
}

/// Where the model's meshes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Wavefront OBJ file
    File(PathBuf),
    /// Generated UV sphere
    Sphere { radius: f32, sectors: u32, stacks: u32 },
}

impl ModelSource {
    /// A billiard ball scaled up to be visible at the default camera distance.
    pub fn ball() -> Self {
        Self::Sphere {
            radius: BALL_RADIUS * 20.0,
            sectors: 36,
            stacks: 18,
        }
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_MODEL_PATH))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shader: ShaderConfig,
    pub model: ModelSource,
    pub clear_color: [f32; 4],
    pub light: Light,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            shader: ShaderConfig::new(
                "model",
                StageSource::File(PathBuf::from(DEFAULT_VERTEX_SHADER)),
                StageSource::File(PathBuf::from(DEFAULT_FRAGMENT_SHADER)),
            ),
            model: ModelSource::default(),
            clear_color: [0.1, 0.1, 0.1, 1.0],
            light: Light::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.window.vsync = vsync;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.camera.near = near;
        self.camera.far = far;
        self
    }

    pub fn with_shader(mut self, shader: ShaderConfig) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_model(mut self, model: ModelSource) -> Self {
        self.model = model;
        self
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }
}
