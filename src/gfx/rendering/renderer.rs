//! Backend-neutral rendering interface
//!
//! The frame loop only talks to a [`Renderer`]: it asks for shader programs
//! and mesh handles at start-up, then submits one [`ScenePass`] per frame.
//! Every [`DrawCall`] names its program, its mesh and its uniforms, so a
//! backend never has to remember what the previous draw bound.

use cgmath::{Matrix4, Vector3};

use crate::error::{ModelError, ShaderError};
use crate::gfx::camera::{convert_matrix4_to_array, Camera};
use crate::gfx::resources::shader::ShaderSources;
use crate::gfx::scene::{Light, MeshData};

pub trait Renderer {
    /// Linked shader program handle
    type Shader;
    /// Uploaded mesh handle
    type Mesh;
    /// In-flight frame, from [`begin_frame`](Self::begin_frame) to
    /// [`present`](Self::present)
    type Frame;

    fn compile_shader(&mut self, sources: &ShaderSources) -> Result<Self::Shader, ShaderError>;

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<Self::Mesh, ModelError>;

    /// Called with the new framebuffer size; never with a zero dimension.
    fn resize(&mut self, width: u32, height: u32);

    /// Acquires the next frame, or `None` when nothing can be drawn this
    /// iteration (surface lost, outdated or timed out).
    fn begin_frame(&mut self) -> Option<Self::Frame>;

    /// Records the scene pass: clear, then every draw call in order.
    fn draw_scene(&mut self, frame: &mut Self::Frame, pass: &ScenePass<'_, Self>);

    /// Submits the frame's work and presents it.
    fn present(&mut self, frame: Self::Frame);
}

/// Per-draw shader inputs, laid out to match `DrawUniforms` in the model
/// shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Camera position, w unused
    pub view_position: [f32; 4],
    /// Light position, w unused
    pub light_position: [f32; 4],
    /// Light colour in xyz, ambient strength in w
    pub light_color: [f32; 4],
}
// 64 + 64 + 16 + 16 + 16 = 176 bytes

impl DrawUniforms {
    pub fn new(camera: &Camera, model: Matrix4<f32>, light: &Light) -> Self {
        Self {
            view_proj: convert_matrix4_to_array(camera.view_projection_matrix()),
            model: convert_matrix4_to_array(model),
            view_position: extend(camera.position(), 1.0),
            light_position: extend(Vector3::from(light.position), 1.0),
            light_color: [
                light.color[0],
                light.color[1],
                light.color[2],
                light.ambient_strength,
            ],
        }
    }
}

fn extend(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// One (program, mesh, uniforms) submission.
pub struct DrawCall<'a, R: Renderer + ?Sized> {
    pub shader: &'a R::Shader,
    pub mesh: &'a R::Mesh,
    pub uniforms: DrawUniforms,
}

/// Everything drawn in the scene pass of one frame.
pub struct ScenePass<'a, R: Renderer + ?Sized> {
    pub clear_color: [f32; 4],
    pub draws: Vec<DrawCall<'a, R>>,
}

impl<'a, R: Renderer + ?Sized> ScenePass<'a, R> {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            clear_color,
            draws: Vec::new(),
        }
    }

    pub fn push(&mut self, shader: &'a R::Shader, mesh: &'a R::Mesh, uniforms: DrawUniforms) {
        self.draws.push(DrawCall {
            shader,
            mesh,
            uniforms,
        });
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}
