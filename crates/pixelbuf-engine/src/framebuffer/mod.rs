//! Window-backed pixel framebuffer.
//!
//! A [`Framebuffer`] owns a window, the GPU context presenting to it, an
//! RGB pixel buffer and the texture mirroring it. The caller drives it:
//!
//! ```no_run
//! use pixelbuf_engine::binding::PixelArray;
//! use pixelbuf_engine::framebuffer::Framebuffer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut fb = Framebuffer::new(320, 240, "pixels")?;
//! let frame = vec![0u8; 320 * 240 * 3];
//! while !fb.should_close() {
//!     fb.replace_pixels(&PixelArray::rgb8(&frame, 320, 240))?;
//!     fb.display()?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Everything happens on the calling thread, which must be the thread that
//! created the framebuffer.

mod config;
mod error;
mod framebuffer;

pub use config::{FramebufferConfig, FLIP_Y_UNIFORM};
pub use error::DisplayError;
pub use framebuffer::Framebuffer;
