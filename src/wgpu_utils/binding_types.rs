// src/wgpu_utils/binding_types.rs
//! WGPU binding type utilities

pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

/// Layout entry visible to both vertex and fragment stages
pub fn rendering_entry(binding: u32, ty: wgpu::BindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    }
}

/// Layout holding a single uniform buffer at binding 0
pub fn single_uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[rendering_entry(0, uniform())],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_entry_visibility() {
        let entry = rendering_entry(3, uniform());
        assert_eq!(entry.binding, 3);
        assert!(entry.visibility.contains(wgpu::ShaderStages::VERTEX));
        assert!(entry.visibility.contains(wgpu::ShaderStages::FRAGMENT));
        assert!(entry.count.is_none());
    }
}
