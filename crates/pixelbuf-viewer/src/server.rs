//! TCP frame server.
//!
//! Accepts one sender at a time. While nobody is connected the window keeps
//! presenting its last frame; while a sender is connected, each frame it
//! sends is uploaded and displayed. Reads block, so a stalled sender also
//! stalls window event handling until its next frame or disconnect.

use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use pixelbuf_engine::{Framebuffer, PixelArray};

use crate::config::ViewerConfig;
use crate::stream::{FrameCodec, FrameReader};

/// Sleep between accept attempts while idle.
const IDLE_POLL: Duration = Duration::from_millis(16);
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

pub struct FrameServer {
    listener: TcpListener,
    fb: Framebuffer,
    codec: FrameCodec,
    max_payload: usize,
}

impl FrameServer {
    pub fn bind(config: &ViewerConfig, fb: Framebuffer) -> Result<Self> {
        let listener = TcpListener::bind(config.listen)
            .with_context(|| format!("failed to listen on {}", config.listen))?;
        listener
            .set_nonblocking(true)
            .context("failed to make the listener non-blocking")?;

        log::info!(
            "listening on {} for {:?} frames of {}x{}",
            listener.local_addr().unwrap_or(config.listen),
            config.codec,
            fb.width(),
            fb.height()
        );

        Ok(Self {
            listener,
            fb,
            codec: config.codec,
            max_payload: config.max_payload,
        })
    }

    /// Serves senders until the window is closed.
    pub fn run(&mut self) -> Result<()> {
        while !self.fb.should_close() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    log::info!("sender connected from {peer}");
                    if let Err(e) = self.serve(stream, peer) {
                        log::warn!("connection from {peer} dropped: {e:#}");
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    self.fb.display()?;
                    thread::sleep(IDLE_POLL);
                }
                Err(e) => return Err(e).context("failed to accept a connection"),
            }
        }

        log::info!("window closed; shutting down");
        Ok(())
    }

    fn serve(&mut self, stream: TcpStream, peer: SocketAddr) -> Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;

        let (width, height) = (self.fb.width(), self.fb.height());
        let mut frames = FrameReader::new(BufReader::new(stream), self.codec, width, height)
            .with_max_payload(self.max_payload);
        let mut last_report = Instant::now();

        while !self.fb.should_close() {
            let Some(frame) = frames.next_frame()? else {
                log::info!("sender {peer} closed the stream");
                break;
            };

            if (frame.width, frame.height) == (width, height) {
                self.fb
                    .replace_pixels(&PixelArray::rgb8(&frame.data, width as usize, height as usize))?;
            } else {
                log::warn!(
                    "skipping {}x{} frame; expected {width}x{height}",
                    frame.width,
                    frame.height
                );
            }
            self.fb.display()?;

            if last_report.elapsed() >= FPS_REPORT_INTERVAL {
                if let Some(t) = self.fb.frame_time() {
                    log::info!("{:.1} fps (frame {})", t.fps, t.frame_index);
                }
                last_report = Instant::now();
            }
        }
        Ok(())
    }
}
