//! WGPU implementation of [`Renderer`]
//!
//! Owns the surface, device and queue, the depth attachment and the
//! per-draw uniform bindings. Frames are recorded into a single command
//! encoder: the scene pass first, then whatever the overlay records into
//! the same encoder, then one submit and present.

use std::sync::Arc;

use cgmath::Matrix4;
use winit::window::Window;

use crate::error::{InitError, ModelError, ShaderError};
use crate::gfx::camera::convert_matrix4_to_array;
use crate::gfx::resources::shader::PipelineTarget;
use crate::gfx::resources::{DepthTexture, DrawBindings, MeshBuffers, ShaderProgram, ShaderSources};
use crate::gfx::scene::MeshData;

use super::renderer::{DrawUniforms, Renderer, ScenePass};

/// Maps OpenGL clip space depth (-1..1) onto wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A frame between [`Renderer::begin_frame`] and [`Renderer::present`].
pub struct RenderFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl RenderFrame {
    /// Encoder and colour target for passes recorded after the scene.
    pub fn target(&mut self) -> (&mut wgpu::CommandEncoder, &wgpu::TextureView) {
        (&mut self.encoder, &self.view)
    }
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    draw_bindings: DrawBindings,
}

impl RenderEngine {
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| InitError::Window("surface is incompatible with the adapter".into()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Configured surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");
        let draw_bindings = DrawBindings::new(&device);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            draw_bindings,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl Renderer for RenderEngine {
    type Shader = ShaderProgram;
    type Mesh = MeshBuffers;
    type Frame = RenderFrame;

    fn compile_shader(&mut self, sources: &ShaderSources) -> Result<ShaderProgram, ShaderError> {
        let target = PipelineTarget {
            color_format: self.config.format,
            depth_format: Some(DepthTexture::DEPTH_FORMAT),
        };
        ShaderProgram::compile(&self.device, sources, &[self.draw_bindings.layout()], target)
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshBuffers, ModelError> {
        if mesh.is_empty() {
            return Err(ModelError::Upload {
                name: mesh.name.clone(),
                message: "mesh has no triangles".into(),
            });
        }
        let vertex_count = mesh.vertices.len();
        if let Some(index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ModelError::Upload {
                name: mesh.name.clone(),
                message: format!("index {} out of range for {} vertices", index, vertex_count),
            });
        }
        Ok(MeshBuffers::upload(&self.device, mesh))
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();

        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
        log::debug!("Resized render targets to {:?}", self.depth_texture.size());
    }

    fn begin_frame(&mut self) -> Option<RenderFrame> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return None;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                return None;
            }
            Err(error) => {
                log::error!("Failed to acquire surface texture: {}", error);
                return None;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        Some(RenderFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    fn draw_scene(&mut self, frame: &mut RenderFrame, pass: &ScenePass<'_, Self>) {
        let uniforms: Vec<DrawUniforms> = pass
            .draws
            .iter()
            .map(|draw| {
                let mut uniforms = draw.uniforms;
                uniforms.view_proj = convert_matrix4_to_array(
                    OPENGL_TO_WGPU_MATRIX * Matrix4::from(uniforms.view_proj),
                );
                uniforms
            })
            .collect();
        self.draw_bindings.write(&self.device, &self.queue, &uniforms);

        let [r, g, b, a] = pass.clear_color;
        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth_texture.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for (index, draw) in pass.draws.iter().enumerate() {
            render_pass.set_pipeline(draw.shader.pipeline());
            self.draw_bindings.bind(&mut render_pass, index);
            draw.mesh.draw(&mut render_pass);
        }
    }

    fn present(&mut self, frame: RenderFrame) {
        let RenderFrame {
            surface_texture,
            encoder,
            ..
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        log::debug!("Releasing render engine");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_depth_remap() {
        // Near plane (z = -w) maps to 0, far plane (z = w) maps to w
        let near = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);

        let xy = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.3, -0.7, 0.0, 1.0);
        assert_eq!((xy.x, xy.y), (0.3, -0.7));
    }
}
