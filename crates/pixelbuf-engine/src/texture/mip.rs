use crate::device::clear_pass;

use super::frame::TEXTURE_FORMAT;

const MIP_BLIT_SHADER: &str = include_str!("../shaders/mip_blit.wgsl");

/// Number of levels in a full mip chain for a `width` x `height` texture,
/// down to and including 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    (u32::BITS - width.max(height).leading_zeros()).max(1)
}

/// Render-pass blits that rebuild levels `1..n` from level 0.
///
/// Views and bind groups for every level are created once; a rebuild only
/// records one pass per level.
pub struct MipChain {
    pipeline: wgpu::RenderPipeline,
    /// `targets[i]` renders level `i + 1`.
    targets: Vec<wgpu::TextureView>,
    /// `sources[i]` samples level `i`.
    sources: Vec<wgpu::BindGroup>,
}

impl MipChain {
    pub fn new(device: &wgpu::Device, texture: &wgpu::Texture, levels: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pixelbuf mip blit shader"),
            source: wgpu::ShaderSource::Wgsl(MIP_BLIT_SHADER.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pixelbuf mip blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pixelbuf mip blit pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pixelbuf mip blit pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(TEXTURE_FORMAT.into())],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Box filter: each target texel averages the 2x2 source texels under it.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pixelbuf mip blit sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let views: Vec<wgpu::TextureView> = (0..levels)
            .map(|level| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("pixelbuf mip level view"),
                    base_mip_level: level,
                    mip_level_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        let sources = views[..views.len().saturating_sub(1)]
            .iter()
            .map(|view| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("pixelbuf mip source bind group"),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                })
            })
            .collect();

        let targets = views.into_iter().skip(1).collect();

        Self {
            pipeline,
            targets,
            sources,
        }
    }

    /// Records one blit pass per derived level, largest first.
    pub fn generate(&self, encoder: &mut wgpu::CommandEncoder) {
        for (target, source) in self.targets.iter().zip(&self.sources) {
            let mut pass = clear_pass(encoder, "pixelbuf mip blit pass", target, wgpu::Color::BLACK);
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, source, &[]);
            pass.draw(0..3, 0..1);
        }
    }
}
