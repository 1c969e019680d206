//! Window and event pumping.
//!
//! Owns the `winit` EventLoop and Window. The loop is pumped by the caller
//! once per displayed frame instead of running as a callback loop.

mod host;

pub use host::{Pumped, WindowConfig, WindowHost};
