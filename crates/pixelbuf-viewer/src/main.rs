//! pixelbuf viewer.
//!
//! Opens a framebuffer window and shows the frames a TCP sender streams to
//! it, either raw RGB or length-prefixed JPEG.

use anyhow::Result;
use clap::Parser;
use pixelbuf_engine::logging::{init_logging, LoggingConfig};
use pixelbuf_engine::Framebuffer;

mod cli;
mod config;
mod server;
mod stream;

use cli::Cli;
use config::ViewerConfig;
use server::FrameServer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ViewerConfig::resolve(&cli)?;

    init_logging(LoggingConfig {
        filter: config.log.clone(),
    });

    let fb = Framebuffer::with_config(config.framebuffer_config())?;
    if !fb.shader().is_valid() {
        log::warn!("shader program failed to build; the window will only show the background");
    }

    FrameServer::bind(&config, fb)?.run()
}
