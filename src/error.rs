//! Error types for application start-up
//!
//! Every variant here is fatal: it aborts initialization and the process
//! exits non-zero. Conditions that can be recovered from at runtime (a
//! missing monitor, a lost surface, zero-sized viewports) are handled where
//! they are detected and never show up as values of these types.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::resources::shader::ShaderStage;

/// Failure to acquire one of the collaborators the render loop depends on.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("application has already shut down")]
    Terminated,
}

/// Shader source loading and program compilation failures.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader source '{}' is empty", path.display())]
    EmptySource { path: PathBuf },

    #[error("{0} shaders are not supported by this renderer")]
    UnsupportedStage(ShaderStage),

    #[error("{stage} shader '{label}' failed to compile: {message}")]
    Compile {
        label: String,
        stage: ShaderStage,
        message: String,
    },

    #[error("shader program '{label}' failed to link: {message}")]
    Link { label: String, message: String },
}

/// Model import and upload failures.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to import model '{}': {source}", path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model '{}' contains no triangle meshes", path.display())]
    Empty { path: PathBuf },

    #[error("failed to upload mesh '{name}': {message}")]
    Upload { name: String, message: String },
}
