/// Begins a render pass over `view` that clears it to `clear` first.
///
/// Every pass in this crate has a single color attachment and no depth.
pub fn clear_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// The swapchain image being drawn this frame.
///
/// Acquired by [`Gpu::begin_frame`](super::Gpu::begin_frame) and presented by
/// [`Gpu::submit`](super::Gpu::submit). The next image cannot be acquired
/// while this one is alive.
pub struct SurfaceFrame {
    pub(super) surface_texture: wgpu::SurfaceTexture,
    pub(super) view: wgpu::TextureView,
    pub(super) encoder: wgpu::CommandEncoder,
}

impl SurfaceFrame {
    /// The frame's render pass, cleared to `background`.
    pub fn pass(&mut self, background: wgpu::Color) -> wgpu::RenderPass<'_> {
        clear_pass(&mut self.encoder, "pixelbuf frame pass", &self.view, background)
    }
}
