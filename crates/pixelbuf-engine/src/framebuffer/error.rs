use thiserror::Error;

/// A frame that could not be presented.
///
/// Transient surface conditions (lost, outdated, timeout) are not errors:
/// the surface is reconfigured and the frame is skipped.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("surface can no longer be presented to: {0}")]
    Surface(#[source] wgpu::SurfaceError),
}
