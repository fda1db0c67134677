//! WGPU binding type utilities

/// Uniform buffer bound at a per-draw offset, each slot `T`-sized.
pub fn dynamic_uniform<T>() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: true,
        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_uniform_binding_size() {
        match dynamic_uniform::<[f32; 4]>() {
            wgpu::BindingType::Buffer {
                has_dynamic_offset,
                min_binding_size,
                ..
            } => {
                assert!(has_dynamic_offset);
                assert_eq!(min_binding_size.map(|size| size.get()), Some(16));
            }
            other => panic!("unexpected binding type {:?}", other),
        }
    }
}
