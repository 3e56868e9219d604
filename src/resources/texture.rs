use std::collections::HashMap;

use anyhow::Context;

use crate::data_structures::{atlas::AtlasSet, texture::Texture};

pub fn atlas_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("atlas_bind_group_layout"),
    })
}

/// An atlas living on the GPU.
#[derive(Debug)]
pub struct GpuAtlas {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

/// Every atlas of an [`AtlasSet`] uploaded to the GPU, keyed by alias.
#[derive(Debug, Default)]
pub struct AtlasTextures {
    atlases: HashMap<String, GpuAtlas>,
}

impl AtlasTextures {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        atlases: &AtlasSet,
    ) -> anyhow::Result<Self> {
        let mut uploaded = HashMap::with_capacity(atlases.len());
        for atlas in atlases.iter() {
            let texture = Texture::from_image(device, queue, atlas.image(), Some(atlas.alias()))
                .with_context(|| format!("uploading atlas `{}`", atlas.alias()))?;
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
                label: Some(atlas.alias()),
            });
            uploaded.insert(
                atlas.alias().to_string(),
                GpuAtlas {
                    texture,
                    bind_group,
                    width: atlas.width(),
                    height: atlas.height(),
                },
            );
        }
        Ok(Self { atlases: uploaded })
    }

    pub fn get(&self, alias: &str) -> Option<&GpuAtlas> {
        self.atlases.get(alias)
    }
}
