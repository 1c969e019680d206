//! Color model for the clear pass.

pub mod color;

pub use color::Color;
