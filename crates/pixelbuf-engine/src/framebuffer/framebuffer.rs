use anyhow::{Context, Result};

use crate::binding::{PixelArray, PixelError};
use crate::device::Gpu;
use crate::mesh::QuadMesh;
use crate::paint::Color;
use crate::pixels::PixelBuffer;
use crate::shader::{PipelineTargets, ShaderProgram, TEXTURE_GROUP};
use crate::texture::FrameTexture;
use crate::time::{FrameClock, FrameTime};
use crate::window::{WindowConfig, WindowHost};

use super::config::{FramebufferConfig, FLIP_Y_UNIFORM};
use super::error::DisplayError;

/// A window showing a caller-supplied RGB pixel buffer.
pub struct Framebuffer {
    // Field order is drop order: GPU objects go before the device, the
    // device before the surface's window, the window before the event loop.
    shader: ShaderProgram,
    texture: FrameTexture,
    mesh: QuadMesh,
    gpu: Gpu,
    host: WindowHost,

    pixels: PixelBuffer,
    clock: FrameClock,
    last_frame: Option<FrameTime>,
    background: Color,
    flip_vertical: bool,
}

impl Framebuffer {
    /// Opens a `width` x `height` window titled `title` with default settings.
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self> {
        Self::with_config(FramebufferConfig::new(width, height, title))
    }

    pub fn with_config(config: FramebufferConfig) -> Result<Self> {
        let FramebufferConfig {
            title,
            width,
            height,
            shader,
            diagnostics,
            background,
            generate_mipmaps,
            flip_vertical,
            resizable,
            any_thread,
            gpu,
        } = config;

        anyhow::ensure!(
            width > 0 && height > 0,
            "framebuffer size must be non-zero, got {width}x{height}"
        );

        let host = WindowHost::open(WindowConfig {
            title,
            size: winit::dpi::PhysicalSize::new(width, height),
            resizable,
            any_thread,
        })?;

        let gpu = pollster::block_on(Gpu::new(host.window().clone(), gpu))
            .context("failed to initialize the GPU context")?;

        let max = gpu.max_texture_dimension();
        anyhow::ensure!(
            width <= max && height <= max,
            "framebuffer size {width}x{height} exceeds the device texture limit of {max}"
        );

        let texture = FrameTexture::new(gpu.device(), gpu.queue(), width, height, generate_mipmaps);
        let shader = ShaderProgram::new(
            gpu.device(),
            &shader,
            &PipelineTargets {
                color_format: gpu.surface_format(),
                texture_layout: texture.layout(),
            },
            diagnostics,
        );
        let mesh = QuadMesh::new(gpu.device());

        log::info!(
            "framebuffer {width}x{height} ready ({} mip levels, shader {})",
            texture.mip_level_count(),
            if shader.is_valid() { "linked" } else { "inert" }
        );

        let mut this = Self {
            shader,
            texture,
            mesh,
            gpu,
            host,
            pixels: PixelBuffer::new(width as usize, height as usize),
            clock: FrameClock::new(),
            last_frame: None,
            background,
            flip_vertical,
        };
        this.write_flip_uniform();
        Ok(this)
    }

    /// Whether the user asked to close the window. Updated by [`display`](Self::display).
    #[inline]
    pub fn should_close(&self) -> bool {
        self.host.close_requested()
    }

    /// Validates `array`, copies it into the pixel buffer and uploads it.
    ///
    /// On error nothing changes: neither the buffer nor the texture.
    pub fn replace_pixels(&mut self, array: &PixelArray<'_>) -> Result<(), PixelError> {
        array.copy_into(&mut self.pixels)?;
        self.texture
            .upload(self.gpu.device(), self.gpu.queue(), &self.pixels);
        Ok(())
    }

    /// Handles pending window events and draws the current texture.
    ///
    /// Does not upload anything; the texture changes only in
    /// [`replace_pixels`](Self::replace_pixels).
    pub fn display(&mut self) -> Result<(), DisplayError> {
        if let Some(size) = self.host.pump().resized {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            self.gpu.resize(size);
        }

        self.last_frame = Some(self.clock.tick());

        if !self.gpu.is_drawable() {
            return Ok(());
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => return self.gpu.recover(err).map_err(DisplayError::Surface),
        };

        {
            let mut pass = frame.pass(self.background.to_wgpu());
            if self.shader.activate(&mut pass) {
                pass.set_bind_group(TEXTURE_GROUP, self.texture.bind_group(), &[]);
                self.mesh.draw(&mut pass);
            }
        }

        self.gpu.submit(frame);
        Ok(())
    }

    /// Sets an integer uniform on the active shader program.
    pub fn set_uniform_int(&self, name: &str, value: i32) -> bool {
        self.shader.set_uniform_int(self.gpu.queue(), name, value)
    }

    pub fn set_flip_vertical(&mut self, flip: bool) {
        self.flip_vertical = flip;
        self.write_flip_uniform();
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width() as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height() as u32
    }

    #[inline]
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    #[inline]
    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    /// Timing of the most recent [`display`](Self::display) call.
    #[inline]
    pub fn frame_time(&self) -> Option<FrameTime> {
        self.last_frame
    }

    #[inline]
    pub fn window(&self) -> &winit::window::Window {
        self.host.window()
    }

    fn write_flip_uniform(&self) {
        if self.shader.has_uniform(FLIP_Y_UNIFORM) {
            self.set_uniform_int(FLIP_Y_UNIFORM, self.flip_vertical as i32);
        }
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        log::debug!(
            "releasing framebuffer {}x{} after {} frames",
            self.width(),
            self.height(),
            self.clock.frames()
        );
    }
}
