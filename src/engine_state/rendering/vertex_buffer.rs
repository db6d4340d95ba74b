//! GPU vertex buffers for chunk geometry.

use wgpu::{util::DeviceExt, Buffer, Device};

use super::Vertex;

/// A non-indexed triangle list living on the GPU.
pub struct VertexBuffer {
    buffer: Buffer,
    vertex_count: u32,
}

impl VertexBuffer {
    /// Uploads `vertices` into a new buffer.
    ///
    /// Returns `None` for an empty list; zero-sized vertex buffers are never created.
    pub fn from_vertices(device: &Device, label: &str, vertices: &[Vertex]) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Some(Self {
            buffer,
            vertex_count: vertices.len() as u32,
        })
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Vertices in the buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Triangles in the buffer.
    pub fn primitive_count(&self) -> u32 {
        self.vertex_count / 3
    }
}
