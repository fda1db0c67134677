use wgpu::util::DeviceExt;

use crate::gfx::scene::MeshData;

/// Vertex and index buffers of one uploaded sub-mesh.
///
/// Owns both buffers; they are released when the value is dropped.
pub struct MeshBuffers {
    name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} indices",
            mesh.name,
            mesh.vertices.len(),
            mesh.indices.len()
        );

        Self {
            name: mesh.name.clone(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Binds both buffers and issues the indexed draw. Nothing is assumed
    /// to be bound from a previous draw except the pipeline and bind group
    /// the caller just set.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Drop for MeshBuffers {
    fn drop(&mut self) {
        log::debug!("Releasing mesh buffers '{}'", self.name);
    }
}
