//! GPU resource management
//!
//! Owned wrappers around GPU objects: shader programs, mesh buffers, the
//! depth attachment and the per-draw uniform bindings. Each wrapper is the
//! sole owner of its objects and releases them when dropped.

pub mod draw_bindings;
pub mod mesh_buffers;
pub mod shader;
pub mod texture_resource;

// Re-export main types
pub use draw_bindings::DrawBindings;
pub use mesh_buffers::MeshBuffers;
pub use shader::{ShaderConfig, ShaderProgram, ShaderSources, ShaderStage, StageSource};
pub use texture_resource::DepthTexture;
