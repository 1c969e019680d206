use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::stream::FrameCodec;

/// Command-line flags. Anything left unset falls back to the config file,
/// then to built-in defaults.
#[derive(Debug, Default, Parser)]
#[command(name = "pixelbuf-viewer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shows an RGB frame stream received over TCP", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Frame width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Wire format of incoming frames
    #[arg(long, value_enum)]
    pub codec: Option<FrameCodec>,

    /// Vertex shader (WGSL); requires --fragment
    #[arg(long, requires = "fragment")]
    pub vertex: Option<PathBuf>,

    /// Fragment shader (WGSL); requires --vertex
    #[arg(long, requires = "vertex")]
    pub fragment: Option<PathBuf>,

    /// Do not rebuild mipmaps after each frame
    #[arg(long)]
    pub no_mipmaps: bool,

    /// Report shader misuse (unknown uniforms and the like)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress shader misuse reports
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter, `RUST_LOG` syntax
    #[arg(long)]
    pub log: Option<String>,
}
