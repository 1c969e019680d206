//! Shader programs.
//!
//! A program is a vertex + fragment WGSL pair that goes through three steps:
//! - load: read both sources (files, inline strings, or the built-in pair)
//! - compile: parse and validate each stage with naga
//! - link: check the stages against each other and against the quad
//!   contract, then build the wgpu render pipeline
//!
//! Any failure leaves an inert [`ShaderProgram`] behind instead of an error:
//! the caller keeps a live object whose draw calls do nothing.

mod error;
mod interface;
mod program;
mod source;

pub use error::{ShaderError, Stage};
pub use interface::{
    compile, CompiledStage, IntKind, ProgramInterface, UniformDecl, SAMPLER_BINDING,
    TEXTURE_BINDING, TEXTURE_GROUP, UNIFORM_GROUP,
};
pub use program::{PipelineTargets, ShaderProgram};
pub use source::{ShaderSource, StageText, BUILTIN_FRAGMENT, BUILTIN_VERTEX};
