//! Frame timing.
//!
//! The framebuffer ticks one [`FrameClock`] per `display()`; the snapshot it
//! returns carries the frame index, the delta time and a smoothed rate.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
