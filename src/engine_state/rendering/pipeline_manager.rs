//! Render pipelines for block geometry.
//!
//! wgpu bakes depth and blend state into the pipeline, so the two passes of a frame are
//! two pipelines built from the same shader:
//!
//! - `opaque`: depth test and depth write, blending replaces the target
//! - `alpha_blended`: depth test against the opaque pass without writing, alpha blending
//!
//! Both cull back faces of counter-clockwise triangles, matching the winding emitted by
//! chunk geometry reconstruction.

use wgpu::{Device, RenderPipeline, ShaderModule, TextureFormat};

use super::{bind_group_state::BindGroupState, texture::Texture, vertex::Vertex};

/// The two block pipelines.
pub struct PipelineManager {
    /// Pass 1: opaque geometry
    opaque: RenderPipeline,
    /// Pass 2: alpha-blended geometry, drawn back to front
    alpha_blended: RenderPipeline,
}

impl PipelineManager {
    /// Compiles the block shader and creates both pipelines.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `shader_source` - WGSL source of the block shader
    /// * `texture_format` - Format of the surface being drawn to
    /// * `bind_group_state` - Provides the bind group layouts for the pipeline layout
    pub fn new(
        device: &Device,
        shader_source: &str,
        texture_format: TextureFormat,
        bind_group_state: &BindGroupState,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Block Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Block Render Pipeline Layout"),
            bind_group_layouts: &bind_group_state.ordered_layouts(),
            push_constant_ranges: &[],
        });

        let opaque = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            texture_format,
            "Opaque Block Pipeline",
            wgpu::BlendState::REPLACE,
            true,
        );
        let alpha_blended = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            texture_format,
            "Alpha Blended Block Pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        Self {
            opaque,
            alpha_blended,
        }
    }

    /// The opaque pass pipeline.
    pub fn opaque(&self) -> &RenderPipeline {
        &self.opaque
    }

    /// The alpha-blended pass pipeline.
    pub fn alpha_blended(&self) -> &RenderPipeline {
        &self.alpha_blended
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &ShaderModule,
        texture_format: TextureFormat,
        label: &str,
        blend: wgpu::BlendState,
        depth_write_enabled: bool,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }
}
