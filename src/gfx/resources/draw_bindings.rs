//! Per-draw uniform bindings
//!
//! Group 0 of the model pipeline is a single dynamic-offset uniform buffer.
//! Each draw of a frame gets its own slot, written once before the pass is
//! recorded and selected with `set_bind_group(0, .., &[offset])`.

use crate::gfx::rendering::DrawUniforms;
use crate::wgpu_utils::{binding_types, DynamicUniformBuffer};

const INITIAL_SLOTS: usize = 16;

pub struct DrawBindings {
    layout: wgpu::BindGroupLayout,
    uniforms: DynamicUniformBuffer<DrawUniforms>,
    bind_group: wgpu::BindGroup,
}

impl DrawBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::dynamic_uniform::<DrawUniforms>(),
                count: None,
            }],
        });
        let uniforms = DynamicUniformBuffer::new(device, INITIAL_SLOTS);
        let bind_group = Self::create_bind_group(device, &layout, &uniforms);

        Self {
            layout,
            uniforms,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniforms: &DynamicUniformBuffer<DrawUniforms>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Uniforms Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding_resource(),
            }],
        })
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Uploads one slot per draw, growing the buffer when needed.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[DrawUniforms]) {
        if self.uniforms.ensure_capacity(device, draws.len()) {
            self.bind_group = Self::create_bind_group(device, &self.layout, &self.uniforms);
        }
        self.uniforms.write_slots(queue, draws);
    }

    /// Binds the slot of draw `index` at group 0.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>, index: usize) {
        render_pass.set_bind_group(0, &self.bind_group, &[self.uniforms.offset(index)]);
    }
}
