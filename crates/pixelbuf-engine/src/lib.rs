//! pixelbuf engine crate.
//!
//! Shows a caller-owned RGB pixel array in a window: the pixels are
//! validated, uploaded as a texture and drawn on a full-window quad through
//! a WGSL shader program, one synchronous frame at a time.

pub mod binding;
pub mod device;
pub mod framebuffer;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod pixels;
pub mod shader;
pub mod texture;
pub mod time;
pub mod window;

pub use binding::{ElementType, PixelArray, PixelError};
pub use framebuffer::{DisplayError, Framebuffer, FramebufferConfig};
pub use logging::DiagnosticLevel;
pub use pixels::{PixelBuffer, Rgb};
pub use shader::{ShaderProgram, ShaderSource};
