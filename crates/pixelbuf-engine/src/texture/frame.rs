use crate::pixels::{PixelBuffer, Rgb};
use crate::shader::{SAMPLER_BINDING, TEXTURE_BINDING};

use super::mip::{mip_level_count, MipChain};

/// Format of the frame texture. Linear, so bytes are sampled as-is.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Writes `src` into `dst` as opaque RGBA, reusing `dst`'s allocation.
pub fn expand_rgb_to_rgba(src: &[Rgb], dst: &mut Vec<u8>) {
    dst.clear();
    dst.reserve(src.len() * 4);
    dst.extend(src.iter().flat_map(|p| p.to_rgba()));
}

/// Texture sized to the framebuffer, with its sampler and bind group 0.
pub struct FrameTexture {
    texture: wgpu::Texture,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    size: wgpu::Extent3d,
    mips: Option<MipChain>,
    staging: Vec<u8>,
}

impl FrameTexture {
    /// Layout of bind group 0 as shaders see it: the texture at binding 0,
    /// a filtering sampler at binding 1.
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pixelbuf frame texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Allocates a `width` x `height` texture and uploads black into it.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        generate_mipmaps: bool,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let mip_level_count = if generate_mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };

        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if mip_level_count > 1 {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pixelbuf frame texture"),
            size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Magnify blocky, minify smooth, snap to the nearest mip level.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pixelbuf frame sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let layout = Self::bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pixelbuf frame texture bind group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let mips = (mip_level_count > 1).then(|| MipChain::new(device, &texture, mip_level_count));

        let mut this = Self {
            texture,
            layout,
            bind_group,
            size,
            mips,
            staging: Vec::new(),
        };
        this.upload(device, queue, &PixelBuffer::new(width as usize, height as usize));
        this
    }

    #[inline]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    #[inline]
    pub fn size(&self) -> wgpu::Extent3d {
        self.size
    }

    #[inline]
    pub fn mip_level_count(&self) -> u32 {
        self.texture.mip_level_count()
    }

    /// Replaces the whole texture with `pixels` and rebuilds the mip chain.
    ///
    /// `pixels` must match the texture size; the framebuffer guarantees it.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, pixels: &PixelBuffer) {
        debug_assert_eq!(pixels.width() as u32, self.size.width);
        debug_assert_eq!(pixels.height() as u32, self.size.height);

        expand_rgb_to_rgba(pixels.pixels(), &mut self.staging);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.staging,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.width),
                rows_per_image: Some(self.size.height),
            },
            self.size,
        );

        if let Some(mips) = &self.mips {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pixelbuf mip encoder"),
            });
            mips.generate(&mut encoder);
            queue.submit(std::iter::once(encoder.finish()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::headless;

    #[test]
    fn expansion_adds_opaque_alpha() {
        let mut out = vec![9; 3];
        expand_rgb_to_rgba(&[Rgb::new(1, 2, 3), Rgb::RED], &mut out);
        assert_eq!(out, [1, 2, 3, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn expansion_reuses_allocation() {
        let src = vec![Rgb::WHITE; 64];
        let mut out = Vec::new();
        expand_rgb_to_rgba(&src, &mut out);
        let cap = out.capacity();
        expand_rgb_to_rgba(&src, &mut out);
        assert_eq!(out.capacity(), cap);
        assert_eq!(out.len(), 256);
    }

    #[test]
    fn texture_with_mips_accepts_uploads() {
        let Some((device, queue)) = headless() else { return };
        let mut texture = FrameTexture::new(&device, &queue, 8, 4, true);
        assert_eq!(texture.mip_level_count(), 4);

        let mut pixels = PixelBuffer::new(8, 4);
        pixels.copy_from_bytes(&vec![200; 8 * 4 * 3]);
        texture.upload(&device, &queue, &pixels);
    }

    #[test]
    fn texture_without_mips_has_one_level() {
        let Some((device, queue)) = headless() else { return };
        let texture = FrameTexture::new(&device, &queue, 16, 16, false);
        assert_eq!(texture.mip_level_count(), 1);
        assert_eq!(texture.size().width, 16);
    }
}
