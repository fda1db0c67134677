//! Shader sources and compiled shader programs
//!
//! Sources are WGSL text, either read from disk or given inline. Each stage
//! lives in its own module with the entry points [`VERTEX_ENTRY`] and
//! [`FRAGMENT_ENTRY`]. A [`ShaderProgram`] is the linked result: one render
//! pipeline built from both stages.

use std::fmt;
use std::path::{Path, PathBuf};

use wgpu::*;

use crate::error::ShaderError;
use crate::gfx::scene::vertex::Vertex3D;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Path reported for inline sources in errors.
const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        };
        f.write_str(name)
    }
}

/// Where one stage's source text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StageSource {
    File(PathBuf),
    Inline(String),
}

impl StageSource {
    /// Reads the source text. Whitespace-only sources are rejected.
    pub fn load(&self) -> Result<String, ShaderError> {
        let (text, path) = match self {
            StageSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                    path: path.clone(),
                    source,
                })?;
                (text, path.as_path())
            }
            StageSource::Inline(text) => (text.clone(), Path::new(INLINE_SOURCE)),
        };

        if text.trim().is_empty() {
            return Err(ShaderError::EmptySource {
                path: path.to_path_buf(),
            });
        }
        Ok(text)
    }
}

/// Configured stage sources of one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderConfig {
    pub label: String,
    pub vertex: StageSource,
    pub fragment: StageSource,
    pub geometry: Option<StageSource>,
}

impl ShaderConfig {
    pub fn new(label: impl Into<String>, vertex: StageSource, fragment: StageSource) -> Self {
        Self {
            label: label.into(),
            vertex,
            fragment,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: StageSource) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Reads every configured stage.
    pub fn load(&self) -> Result<ShaderSources, ShaderError> {
        log::debug!("Loading shader sources for '{}'", self.label);
        Ok(ShaderSources {
            label: self.label.clone(),
            vertex: self.vertex.load()?,
            fragment: self.fragment.load()?,
            geometry: self.geometry.as_ref().map(StageSource::load).transpose()?,
        })
    }
}

/// Loaded source text, ready for compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
    pub geometry: Option<String>,
}

/// Output formats a program renders into.
#[derive(Debug, Clone, Copy)]
pub struct PipelineTarget {
    pub color_format: TextureFormat,
    pub depth_format: Option<TextureFormat>,
}

/// Compiled and linked vertex + fragment program.
///
/// Owns its render pipeline; the GPU object is released when the program
/// is dropped.
pub struct ShaderProgram {
    label: String,
    pipeline: RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a pipeline that takes
    /// [`Vertex3D`] vertices and `bind_group_layouts` as groups 0.. .
    ///
    /// WGPU reports compile and link problems through error scopes, so each
    /// step runs inside its own validation scope.
    pub fn compile(
        device: &Device,
        sources: &ShaderSources,
        bind_group_layouts: &[&BindGroupLayout],
        target: PipelineTarget,
    ) -> Result<Self, ShaderError> {
        if sources.geometry.is_some() {
            return Err(ShaderError::UnsupportedStage(ShaderStage::Geometry));
        }

        let vertex = compile_stage(device, &sources.label, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = compile_stage(
            device,
            &sources.label,
            ShaderStage::Fragment,
            &sources.fragment,
        )?;

        device.push_error_scope(ErrorFilter::Validation);

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", sources.label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let depth_stencil = target.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&sources.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &vertex,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(ColorTargetState {
                    format: target.color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: Some(Face::Back),
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                label: sources.label.clone(),
                message: error.to_string(),
            });
        }

        log::info!("Compiled shader program '{}'", sources.label);
        Ok(Self {
            label: sources.label.clone(),
            pipeline,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        log::debug!("Releasing shader program '{}'", self.label);
    }
}

fn compile_stage(
    device: &Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderModule, ShaderError> {
    device.push_error_scope(ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(&format!("{} {}", label, stage)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Compile {
            label: label.to_string(),
            stage,
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}
