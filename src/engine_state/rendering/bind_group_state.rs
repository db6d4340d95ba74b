//! Manages WebGPU bind groups and their layouts.
//!
//! The block shader reads two bind groups:
//! - group 0: the per-frame scene uniform (view, projection, ambient colour, toggles)
//! - group 1: the block atlas texture and its sampler
//!
//! Groups are stored by name and bound in [`BIND_GROUP_ORDER`], which is also the order
//! of the layouts handed to the pipeline layout.

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPass};

use super::texture::Texture;

/// Name of the scene uniform bind group
pub const SCENE_BIND_GROUP: &str = "scene_bind_group";
/// Name of the scene uniform bind group layout
pub const SCENE_BIND_GROUP_LAYOUT: &str = "scene_bind_group_layout";
/// Name of the atlas bind group
pub const ATLAS_BIND_GROUP: &str = "atlas_bind_group";
/// Name of the atlas bind group layout
pub const ATLAS_BIND_GROUP_LAYOUT: &str = "atlas_bind_group_layout";

/// Group names paired with their layout names, in shader group index order.
const BIND_GROUP_ORDER: [(&str, &str); 2] = [
    (SCENE_BIND_GROUP, SCENE_BIND_GROUP_LAYOUT),
    (ATLAS_BIND_GROUP, ATLAS_BIND_GROUP_LAYOUT),
];

/// Owns the bind groups used by the block pipelines.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, BindGroupLayout>,
}

impl BindGroupState {
    /// Creates the scene and atlas bind groups.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `scene_uniform` - Uniform buffer rewritten at the end of every frame
    /// * `atlas` - The uploaded block atlas
    pub fn new(device: &Device, scene_uniform: &Buffer, atlas: &Texture) -> Self {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let (scene_bind_group, scene_bind_group_layout) =
            Self::generate_scene_bindgroups(device, scene_uniform);
        bind_groups.insert(SCENE_BIND_GROUP, scene_bind_group);
        bind_group_layouts.insert(SCENE_BIND_GROUP_LAYOUT, scene_bind_group_layout);

        let (atlas_bind_group, atlas_bind_group_layout) =
            Self::generate_atlas_bindgroups(device, atlas);
        bind_groups.insert(ATLAS_BIND_GROUP, atlas_bind_group);
        bind_group_layouts.insert(ATLAS_BIND_GROUP_LAYOUT, atlas_bind_group_layout);

        Self {
            bind_groups,
            bind_group_layouts,
        }
    }

    /// Retrieves a bind group by name.
    pub fn get_bind_group(&self, name: &str) -> Option<&BindGroup> {
        self.bind_groups.get(name)
    }

    /// Retrieves a bind group layout by name.
    pub fn get_bind_group_layout(&self, name: &str) -> Option<&BindGroupLayout> {
        self.bind_group_layouts.get(name)
    }

    /// Layouts in shader group index order, for building a pipeline layout.
    pub fn ordered_layouts(&self) -> Vec<&BindGroupLayout> {
        BIND_GROUP_ORDER
            .iter()
            .filter_map(|(_, layout)| self.get_bind_group_layout(layout))
            .collect()
    }

    /// Binds every group at its shader index.
    pub fn bind_all(&self, render_pass: &mut RenderPass<'_>) {
        for (index, (name, _)) in BIND_GROUP_ORDER.iter().enumerate() {
            if let Some(bind_group) = self.get_bind_group(name) {
                render_pass.set_bind_group(index as u32, bind_group, &[]);
            }
        }
    }

    /// Creates the bind group for the scene uniform.
    ///
    /// # Returns
    /// A tuple containing the bind group and its layout
    fn generate_scene_bindgroups(device: &Device, scene_uniform: &Buffer) -> (BindGroup, BindGroupLayout) {
        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(SCENE_BIND_GROUP_LAYOUT),
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform.as_entire_binding(),
            }],
            label: Some(SCENE_BIND_GROUP),
        });

        (scene_bind_group, scene_bind_group_layout)
    }

    /// Creates the bind group for the atlas texture and sampler.
    ///
    /// # Returns
    /// A tuple containing the bind group and its layout
    fn generate_atlas_bindgroups(device: &Device, atlas: &Texture) -> (BindGroup, BindGroupLayout) {
        let atlas_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // This should match the filterable field of the texture entry above.
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(ATLAS_BIND_GROUP_LAYOUT),
            });

        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
            label: Some(ATLAS_BIND_GROUP),
        });

        (atlas_bind_group, atlas_bind_group_layout)
    }
}
