//! GPU device and surface management.
//!
//! [`Gpu`] owns the wgpu Instance/Adapter/Device/Queue and the swapchain of
//! one window; frames are acquired with [`Gpu::begin_frame`] and handed back
//! with [`Gpu::submit`].

mod frame;
mod gpu;
mod init;
mod surface;

#[cfg(test)]
mod headless;

pub use frame::{clear_pass, SurfaceFrame};
pub use gpu::Gpu;
pub use init::GpuInit;

#[cfg(test)]
pub(crate) use headless::headless;
