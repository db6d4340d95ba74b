//! Vertex data structures and layouts for block rendering.
//!
//! This module defines the vertex format emitted by chunk geometry reconstruction and the
//! matching `wgpu` buffer layout consumed by the block shader.

/// A vertex of a block face.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes), world space
/// - Color: [f32; 4] (16 bytes), white with the block opacity as alpha
/// - Texture Coordinates: [f32; 2] (8 bytes), normalised atlas UVs
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Vertex color multiplied into the sampled texel
    pub color: [f32; 4],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a white vertex whose alpha carries `opacity`.
    ///
    /// # Arguments
    /// * `position` - World space position
    /// * `tex_coords` - Atlas UVs
    /// * `opacity` - Block opacity, 0 transparent to 255 opaque
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], opacity: u8) -> Self {
        Vertex {
            position,
            color: [1.0, 1.0, 1.0, opacity as f32 / 255.0],
            tex_coords,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: color (vec4<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 36);
        assert_eq!(layout.attributes.last().map(|a| a.offset), Some(28));
    }

    #[test]
    fn opacity_becomes_alpha() {
        assert_eq!(Vertex::new([0.0; 3], [0.0; 2], 255).color[3], 1.0);
        assert_eq!(Vertex::new([0.0; 3], [0.0; 2], 0).color[3], 0.0);
    }
}
