use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::error::{ShaderError, Stage};

/// Built-in pass-through vertex stage.
pub const BUILTIN_VERTEX: &str = include_str!("../shaders/quad.vert.wgsl");

/// Built-in texture-sampling fragment stage.
pub const BUILTIN_FRAGMENT: &str = include_str!("../shaders/quad.frag.wgsl");

/// Where a program's two WGSL sources come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShaderSource {
    /// The pair compiled into the crate.
    #[default]
    Builtin,

    /// Two files read at construction time.
    Files { vertex: PathBuf, fragment: PathBuf },

    /// Sources held in memory.
    Inline { vertex: String, fragment: String },
}

/// Text of one stage plus where it came from.
#[derive(Debug, Clone)]
pub struct StageText<'a> {
    pub stage: Stage,
    pub origin: String,
    pub text: Cow<'a, str>,
}

impl ShaderSource {
    pub fn files(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self::Files {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn inline(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Inline {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads both stages, vertex first.
    ///
    /// Stops at the first stage that cannot be opened or is empty.
    pub fn load(&self) -> Result<(StageText<'_>, StageText<'_>), ShaderError> {
        match self {
            ShaderSource::Builtin => Ok((
                borrowed(Stage::Vertex, "<builtin>", BUILTIN_VERTEX),
                borrowed(Stage::Fragment, "<builtin>", BUILTIN_FRAGMENT),
            )),
            ShaderSource::Files { vertex, fragment } => {
                let vs = read_stage(Stage::Vertex, vertex)?;
                let fs = read_stage(Stage::Fragment, fragment)?;
                Ok((vs, fs))
            }
            ShaderSource::Inline { vertex, fragment } => {
                let vs = non_empty(borrowed(Stage::Vertex, "<inline>", vertex))?;
                let fs = non_empty(borrowed(Stage::Fragment, "<inline>", fragment))?;
                Ok((vs, fs))
            }
        }
    }
}

fn borrowed<'a>(stage: Stage, origin: &str, text: &'a str) -> StageText<'a> {
    StageText {
        stage,
        origin: origin.to_string(),
        text: Cow::Borrowed(text),
    }
}

fn read_stage(stage: Stage, path: &Path) -> Result<StageText<'static>, ShaderError> {
    let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Open {
        stage,
        path: path.to_path_buf(),
        source,
    })?;

    non_empty(StageText {
        stage,
        origin: path.display().to_string(),
        text: Cow::Owned(text),
    })
}

fn non_empty(text: StageText<'_>) -> Result<StageText<'_>, ShaderError> {
    if text.text.is_empty() {
        return Err(ShaderError::Empty {
            stage: text.stage,
            origin: text.origin,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pixelbuf-source-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builtin_sources_are_non_empty() {
        let (vs, fs) = ShaderSource::Builtin.load().unwrap();
        assert_eq!(vs.stage, Stage::Vertex);
        assert_eq!(fs.stage, Stage::Fragment);
        assert!(vs.text.contains("@vertex"));
        assert!(fs.text.contains("@fragment"));
    }

    #[test]
    fn missing_vertex_file_is_open_error() {
        let fs = scratch("present.frag.wgsl", BUILTIN_FRAGMENT);
        let src = ShaderSource::files("/nonexistent/pixelbuf/quad.vert.wgsl", fs);
        match src.load() {
            Err(ShaderError::Open { stage, .. }) => assert_eq!(stage, Stage::Vertex),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_fragment_file_is_open_error() {
        let vs = scratch("present.vert.wgsl", BUILTIN_VERTEX);
        let src = ShaderSource::files(vs, "/nonexistent/pixelbuf/quad.frag.wgsl");
        match src.load() {
            Err(ShaderError::Open { stage, .. }) => assert_eq!(stage, Stage::Fragment),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        let vs = scratch("empty.vert.wgsl", "");
        let fs = scratch("full.frag.wgsl", BUILTIN_FRAGMENT);
        assert!(matches!(
            ShaderSource::files(vs, fs).load(),
            Err(ShaderError::Empty { stage: Stage::Vertex, .. })
        ));
    }

    #[test]
    fn files_are_read_verbatim() {
        let vs = scratch("copy.vert.wgsl", BUILTIN_VERTEX);
        let fs = scratch("copy.frag.wgsl", BUILTIN_FRAGMENT);
        let src = ShaderSource::files(&vs, &fs);
        let (v, f) = src.load().unwrap();
        assert_eq!(v.text, BUILTIN_VERTEX);
        assert_eq!(f.text, BUILTIN_FRAGMENT);
        assert_eq!(v.origin, vs.display().to_string());
    }

    #[test]
    fn empty_inline_fragment_is_rejected() {
        let src = ShaderSource::inline(BUILTIN_VERTEX, "");
        assert!(matches!(
            src.load(),
            Err(ShaderError::Empty { stage: Stage::Fragment, .. })
        ));
    }
}
