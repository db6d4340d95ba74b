//! # Scene Renderer
//!
//! Collects the vertex buffers submitted during a frame and draws them in two passes.
//!
//! ## Frame protocol
//! 1. [`SceneRenderer::begin`] records the camera position and the [`RenderPassConfig`]
//!    and clears last frame's requests.
//! 2. [`SceneRenderer::draw_vertices`] and [`SceneRenderer::draw_alpha_blended_vertices`]
//!    queue requests.
//! 3. [`SceneRenderer::end`] uploads the scene uniform, draws every opaque request with
//!    depth writes enabled, then every alpha-blended request farthest first with the
//!    depth buffer read-only.
//!
//! Every frame starts on the opaque pipeline, so nothing from the alpha pass leaks into
//! the next frame.

use std::rc::Rc;

use cgmath::{Matrix4, Point3, SquareMatrix};
use image::RgbaImage;
use log::trace;
use wgpu::{util::DeviceExt, Buffer, Device, Queue, SurfaceConfiguration, TextureView};

use super::{
    bind_group_state::BindGroupState, pipeline_manager::PipelineManager, render_queue::RenderQueue,
    texture::Texture, vertex_buffer::VertexBuffer,
};

/// Shader inputs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassConfig {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    /// Multiply the vertex colour into the output.
    pub vertex_color_enabled: bool,
    /// Sample the block atlas; when off, faces are drawn in vertex colour only.
    pub texture_enabled: bool,
    /// Flat ambient light multiplied into every fragment.
    pub ambient_color: [f32; 3],
}

impl Default for RenderPassConfig {
    fn default() -> Self {
        Self {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            vertex_color_enabled: true,
            texture_enabled: true,
            ambient_color: [1.0, 1.0, 1.0],
        }
    }
}

/// GPU layout of [`RenderPassConfig`], matching `SceneUniform` in `block_shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    /// rgb ambient, w unused
    ambient_color: [f32; 4],
    /// x: vertex colour toggle, y: texture toggle
    flags: [u32; 4],
}

impl From<&RenderPassConfig> for SceneUniform {
    fn from(config: &RenderPassConfig) -> Self {
        let [r, g, b] = config.ambient_color;
        Self {
            view: config.view.into(),
            projection: config.projection.into(),
            ambient_color: [r, g, b, 1.0],
            flags: [
                config.vertex_color_enabled as u32,
                config.texture_enabled as u32,
                0,
                0,
            ],
        }
    }
}

/// Two-pass renderer for block geometry.
pub struct SceneRenderer {
    pipeline_manager: PipelineManager,
    bind_group_state: BindGroupState,
    scene_uniform: Buffer,
    depth_texture: Texture,
    requests: RenderQueue<Rc<VertexBuffer>>,
    pass_config: RenderPassConfig,
}

impl SceneRenderer {
    /// Creates the renderer and its GPU resources.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - Queue used to upload the atlas
    /// * `config` - Surface configuration, for the colour format and depth buffer size
    /// * `shader_source` - WGSL source of the block shader
    /// * `atlas` - Decoded block atlas
    pub fn new(
        device: &Device,
        queue: &Queue,
        config: &SurfaceConfiguration,
        shader_source: &str,
        atlas: &RgbaImage,
    ) -> Self {
        let pass_config = RenderPassConfig::default();
        let scene_uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniform::from(&pass_config)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let atlas_texture = Texture::create_atlas_texture(device, queue, atlas);
        let bind_group_state = BindGroupState::new(device, &scene_uniform, &atlas_texture);
        let pipeline_manager =
            PipelineManager::new(device, shader_source, config.format, &bind_group_state);
        let depth_texture = Texture::create_depth_texture(device, config, "DEPTH TEXTURE");

        Self {
            pipeline_manager,
            bind_group_state,
            scene_uniform,
            depth_texture,
            requests: RenderQueue::default(),
            pass_config,
        }
    }

    /// Starts a frame.
    ///
    /// # Arguments
    /// * `camera_position` - Origin for the back-to-front sort of alpha-blended requests
    /// * `pass_config` - Matrices and shader toggles for this frame
    pub fn begin(&mut self, camera_position: Point3<f32>, pass_config: RenderPassConfig) {
        self.requests.begin(camera_position);
        self.pass_config = pass_config;
    }

    /// Queues opaque geometry.
    pub fn draw_vertices(&mut self, buffer: Rc<VertexBuffer>) {
        self.requests.push_opaque(buffer);
    }

    /// Queues alpha-blended geometry, sorted by the distance from the camera to `position`.
    pub fn draw_alpha_blended_vertices(&mut self, buffer: Rc<VertexBuffer>, position: Point3<f32>) {
        self.requests.push_alpha_blended(buffer, position);
    }

    /// Draws everything queued since [`SceneRenderer::begin`] into `target`.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - Queue the frame is submitted to
    /// * `target` - View of the surface texture for this frame
    pub fn end(&mut self, device: &Device, queue: &Queue, target: &TextureView) {
        queue.write_buffer(
            &self.scene_uniform,
            0,
            bytemuck::bytes_of(&SceneUniform::from(&self.pass_config)),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        let mut primitives = 0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.bind_group_state.bind_all(&mut render_pass);

            render_pass.set_pipeline(self.pipeline_manager.opaque());
            for buffer in self.requests.opaque() {
                render_pass.set_vertex_buffer(0, buffer.buffer().slice(..));
                render_pass.draw(0..buffer.vertex_count(), 0..1);
                primitives += buffer.primitive_count();
            }

            render_pass.set_pipeline(self.pipeline_manager.alpha_blended());
            for buffer in self.requests.sorted_alpha_blended() {
                render_pass.set_vertex_buffer(0, buffer.buffer().slice(..));
                render_pass.draw(0..buffer.vertex_count(), 0..1);
                primitives += buffer.primitive_count();
            }
        }

        queue.submit([encoder.finish()]);
        trace!("Submitted {} primitives", primitives);
    }

    /// Recreates the depth buffer for a resized surface.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }
}
