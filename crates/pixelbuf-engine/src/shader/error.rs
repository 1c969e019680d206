use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Why a shader program ended up inert.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("could not open {stage} shader file {}: {source}", path.display())]
    Open {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader source is empty: {origin}")]
    Empty { stage: Stage, origin: String },

    #[error("{stage} shader compilation failed:\n{log}")]
    Compile { stage: Stage, log: String },

    #[error("shader program linking failed: {0}")]
    Link(String),
}

impl ShaderError {
    pub(crate) fn link(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }
}
