use crate::device::GpuInit;
use crate::logging::DiagnosticLevel;
use crate::paint::Color;
use crate::shader::ShaderSource;

/// Name of the integer uniform the built-in vertex shader reads to decide
/// whether to flip the image vertically.
pub const FLIP_Y_UNIFORM: &str = "flip_y";

/// Everything [`Framebuffer::with_config`](super::Framebuffer::with_config)
/// needs.
#[derive(Debug, Clone)]
pub struct FramebufferConfig {
    pub title: String,
    /// Pixel buffer and window width, in pixels.
    pub width: u32,
    /// Pixel buffer and window height, in pixels.
    pub height: u32,

    pub shader: ShaderSource,
    pub diagnostics: DiagnosticLevel,

    /// Clear colour shown wherever the quad does not cover the surface.
    pub background: Color,

    /// Rebuild the mip chain after every pixel upload.
    pub generate_mipmaps: bool,

    /// Show row 0 of the pixel buffer at the top of the window. Only
    /// applies to shaders that declare [`FLIP_Y_UNIFORM`].
    pub flip_vertical: bool,

    pub resizable: bool,

    /// See [`WindowConfig::any_thread`](crate::window::WindowConfig::any_thread).
    pub any_thread: bool,

    pub gpu: GpuInit,
}

impl FramebufferConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_shader(mut self, shader: ShaderSource) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_diagnostics(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics = level;
        self
    }
}

impl Default for FramebufferConfig {
    fn default() -> Self {
        Self {
            title: "pixelbuf".to_string(),
            width: 800,
            height: 600,
            shader: ShaderSource::Builtin,
            diagnostics: DiagnosticLevel::for_build(),
            background: Color::BACKGROUND,
            generate_mipmaps: true,
            flip_vertical: true,
            resizable: false,
            any_thread: false,
            gpu: GpuInit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::BUILTIN_VERTEX;

    #[test]
    fn defaults_match_reference_behaviour() {
        let cfg = FramebufferConfig::new(4, 4, "t");
        assert_eq!((cfg.width, cfg.height, cfg.title.as_str()), (4, 4, "t"));
        assert_eq!(cfg.background, Color::rgb(0.0, 0.0, 0.2));
        assert!(cfg.generate_mipmaps);
        assert!(cfg.flip_vertical);
        assert!(matches!(cfg.shader, ShaderSource::Builtin));
        assert!(!cfg.gpu.prefer_srgb);
    }

    #[test]
    fn builtin_vertex_shader_declares_flip_uniform() {
        assert!(BUILTIN_VERTEX.contains(FLIP_Y_UNIFORM));
    }
}
