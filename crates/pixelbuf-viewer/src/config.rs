//! Viewer configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! an optional TOML file and command-line flags.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pixelbuf_engine::logging::DiagnosticLevel;
use pixelbuf_engine::shader::ShaderSource;
use pixelbuf_engine::FramebufferConfig;
use serde::Deserialize;

use crate::cli::Cli;
use crate::stream::{FrameCodec, DEFAULT_MAX_PAYLOAD};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub listen: SocketAddr,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub codec: FrameCodec,
    /// Largest accepted JPEG payload in bytes.
    pub max_payload: usize,
    pub shader: Option<ShaderPaths>,
    pub generate_mipmaps: bool,
    pub flip_vertical: bool,
    pub vsync: bool,
    /// `None` picks the build default.
    pub verbose: Option<bool>,
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            width: 800,
            height: 600,
            title: "Shader Server".to_string(),
            codec: FrameCodec::Jpeg,
            max_payload: DEFAULT_MAX_PAYLOAD,
            shader: None,
            generate_mipmaps: true,
            flip_vertical: true,
            vsync: true,
            verbose: None,
            log: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid viewer configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, overlaid by `cli.config` if given, overlaid by the flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(listen) = cli.listen {
            self.listen = listen;
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(codec) = cli.codec {
            self.codec = codec;
        }
        if let (Some(vertex), Some(fragment)) = (&cli.vertex, &cli.fragment) {
            self.shader = Some(ShaderPaths {
                vertex: vertex.clone(),
                fragment: fragment.clone(),
            });
        }
        if cli.no_mipmaps {
            self.generate_mipmaps = false;
        }
        if cli.verbose {
            self.verbose = Some(true);
        }
        if cli.quiet {
            self.verbose = Some(false);
        }
        if let Some(log) = &cli.log {
            self.log = Some(log.clone());
        }
    }

    pub fn diagnostics(&self) -> DiagnosticLevel {
        match self.verbose {
            Some(true) => DiagnosticLevel::Verbose,
            Some(false) => DiagnosticLevel::Quiet,
            None => DiagnosticLevel::for_build(),
        }
    }

    pub fn framebuffer_config(&self) -> FramebufferConfig {
        let shader = match &self.shader {
            Some(paths) => ShaderSource::files(&paths.vertex, &paths.fragment),
            None => ShaderSource::Builtin,
        };

        let mut fb = FramebufferConfig::new(self.width, self.height, self.title.clone())
            .with_shader(shader)
            .with_diagnostics(self.diagnostics());
        fb.generate_mipmaps = self.generate_mipmaps;
        fb.flip_vertical = self.flip_vertical;
        fb.gpu = fb.gpu.with_vsync(self.vsync);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_match_stream_server() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.listen, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.title, "Shader Server");
        assert_eq!(cfg.codec, FrameCodec::Jpeg);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = ViewerConfig::from_toml(
            r#"
            width = 640
            codec = "raw"

            [shader]
            vertex = "a.vert.wgsl"
            fragment = "a.frag.wgsl"
            "#,
        )
        .unwrap();
        assert_eq!((cfg.width, cfg.height), (640, 600));
        assert_eq!(cfg.codec, FrameCodec::Raw);
        assert_eq!(cfg.shader.unwrap().vertex, PathBuf::from("a.vert.wgsl"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ViewerConfig::from_toml("colour = 3").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut cfg = ViewerConfig::from_toml("width = 640\nheight = 480").unwrap();
        let cli = Cli::parse_from(["pixelbuf-viewer", "--width", "320", "--codec", "raw", "-q"]);
        cfg.apply(&cli);

        assert_eq!((cfg.width, cfg.height), (320, 480));
        assert_eq!(cfg.codec, FrameCodec::Raw);
        assert_eq!(cfg.diagnostics(), DiagnosticLevel::Quiet);
    }

    #[test]
    fn shader_flags_must_come_in_pairs() {
        assert!(Cli::try_parse_from(["pixelbuf-viewer", "--vertex", "a.wgsl"]).is_err());
        let cli = Cli::try_parse_from(["pixelbuf-viewer", "--vertex", "a.wgsl", "--fragment", "b.wgsl"]).unwrap();
        let mut cfg = ViewerConfig::default();
        cfg.apply(&cli);
        assert!(cfg.shader.is_some());
    }

    #[test]
    fn framebuffer_config_carries_settings() {
        let mut cfg = ViewerConfig::default();
        cfg.generate_mipmaps = false;
        cfg.verbose = Some(true);
        let fb = cfg.framebuffer_config();
        assert_eq!((fb.width, fb.height), (800, 600));
        assert!(!fb.generate_mipmaps);
        assert_eq!(fb.diagnostics, DiagnosticLevel::Verbose);
        assert!(matches!(fb.shader, ShaderSource::Builtin));
    }
}
