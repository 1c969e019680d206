//! The GPU copy of the pixel buffer.
//!
//! Pixels arrive as RGB bytes but wgpu has no 24-bit texture format, so
//! every upload expands them to RGBA in a reusable staging buffer. Lower
//! mip levels are rebuilt after each upload by a blit pass per level.

mod frame;
mod mip;

pub use frame::{expand_rgb_to_rgba, FrameTexture, TEXTURE_FORMAT};
pub use mip::{mip_level_count, MipChain};
