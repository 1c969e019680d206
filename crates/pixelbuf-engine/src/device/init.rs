/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// Off by default: pixel bytes are shown as-is, with no transfer
    /// function applied between the texture and the surface.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Power preference passed to adapter selection.
    pub power_preference: wgpu::PowerPreference,

    /// Baseline limits requested from the device.
    ///
    /// The texture size limits are raised to whatever the adapter supports,
    /// so a large window still fits.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// FIFO when `vsync`, otherwise the lowest-latency mode the surface
    /// offers (falls back to FIFO at configure time).
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            // GLES 3.0 class drivers (Raspberry Pi) fall short of the full defaults.
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_fit_gles_class_devices() {
        let limits = GpuInit::default().required_limits;
        assert!(limits.check_limits(&wgpu::Limits::downlevel_webgl2_defaults()));
        // Texture group plus uniform group.
        assert!(limits.max_bind_groups >= 2);
    }

    #[test]
    fn adapter_resolution_raises_texture_limit() {
        let adapter = wgpu::Limits {
            max_texture_dimension_2d: 16384,
            ..wgpu::Limits::downlevel_webgl2_defaults()
        };
        let limits = GpuInit::default().required_limits.using_resolution(adapter);
        assert_eq!(limits.max_texture_dimension_2d, 16384);
        assert_eq!(limits.max_compute_workgroup_size_x, 0);
    }

    #[test]
    fn vsync_toggles_present_mode() {
        assert_eq!(GpuInit::default().with_vsync(false).present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(GpuInit::default().with_vsync(true).present_mode, wgpu::PresentMode::Fifo);
    }
}
