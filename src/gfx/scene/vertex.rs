//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by loaded and generated meshes.

/// A 3D vertex with position, texture coordinate and normal.
///
/// The `#[repr(C)]` layout is what [`Vertex3D::desc`] describes to the
/// pipeline, so field order and types must stay in sync with it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Object-space position [x, y, z], shader location 0
    pub position: [f32; 3],
    /// Texture coordinate [u, v], shader location 1
    pub tex_coord: [f32; 2],
    /// Unit normal [nx, ny, nz], shader location 2
    pub normal: [f32; 3],
}

impl Vertex3D {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    /// Returns the vertex buffer layout for wgpu rendering.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
