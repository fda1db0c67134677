use std::marker::PhantomData;

/// Uniform buffer holding one `Content` slot per draw, bound with a dynamic
/// offset.
///
/// Slots are spaced by the device's `min_uniform_buffer_offset_alignment`.
/// The buffer only grows; callers must rebuild bind groups that reference
/// it when [`ensure_capacity`](Self::ensure_capacity) returns `true`.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: usize,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<Content>() as u64, alignment);
        let capacity = capacity.max(1);

        Self {
            buffer: Self::create_buffer(device, stride, capacity),
            stride,
            capacity,
            content_type: PhantomData,
        }
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", Self::name())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Grows the buffer to hold at least `count` slots.
    ///
    /// Returns `true` when the underlying buffer was replaced.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, count: usize) -> bool {
        if count <= self.capacity {
            return false;
        }
        let capacity = count.next_power_of_two();
        log::debug!(
            "Growing {} uniform buffer from {} to {} slots",
            Self::name(),
            self.capacity,
            capacity
        );
        self.buffer = Self::create_buffer(device, self.stride, capacity);
        self.capacity = capacity;
        true
    }

    /// Writes `contents[i]` into slot `i`. Slots past the capacity are
    /// dropped, so call [`ensure_capacity`](Self::ensure_capacity) first.
    pub fn write_slots(&self, queue: &wgpu::Queue, contents: &[Content]) {
        if contents.len() > self.capacity {
            log::warn!(
                "{} uniform buffer holds {} slots, dropping {}",
                Self::name(),
                self.capacity,
                contents.len() - self.capacity
            );
        }
        for (slot, content) in contents.iter().take(self.capacity).enumerate() {
            queue.write_buffer(&self.buffer, self.offset(slot) as u64, bytemuck::bytes_of(content));
        }
    }

    /// Byte offset of `slot`, as passed to `set_bind_group`.
    pub fn offset(&self, slot: usize) -> wgpu::DynamicOffset {
        (self.stride * slot as u64) as wgpu::DynamicOffset
    }

    /// Binding covering a single slot.
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Rounds `size` up to a multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}
