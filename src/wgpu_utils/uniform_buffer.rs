// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A uniform buffer holding exactly one `Content`.
///
/// The last uploaded bytes are kept so frames where nothing changed (a still
/// camera, for instance) issue no queue writes.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    uploaded: Vec<u8>,
    _content: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Creates the buffer already filled with `initial`
    pub fn new(device: &wgpu::Device, initial: &Content) -> Self {
        let short_name = std::any::type_name::<Content>()
            .rsplit("::")
            .next()
            .unwrap_or("Uniform");
        let bytes = bytemuck::bytes_of(initial);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", short_name)),
            contents: bytes,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            uploaded: bytes.to_vec(),
            _content: PhantomData,
        }
    }

    /// Uploads `content` unless it matches what the GPU already has.
    /// Returns whether a write was queued.
    pub fn write(&mut self, queue: &wgpu::Queue, content: &Content) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if self.uploaded == bytes {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.uploaded.clear();
        self.uploaded.extend_from_slice(bytes);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
