//! Frame stream decoding.
//!
//! Two wire formats are understood:
//! - `raw`: back-to-back frames of exactly `width * height * 3` RGB bytes;
//! - `jpeg`: each frame is a big-endian `u32` byte count followed by that
//!   many bytes of JPEG.

use std::io::{self, Read};

use clap::ValueEnum;
use image::ImageFormat;
use serde::Deserialize;
use thiserror::Error;

/// Largest JPEG payload accepted by default.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrameCodec {
    Raw,
    #[default]
    Jpeg,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream ended inside a frame ({read} of {expected} bytes)")]
    Truncated { read: usize, expected: usize },

    #[error("frame payload of {size} bytes exceeds the {max} byte limit")]
    Oversized { size: usize, max: usize },

    #[error("failed to decode jpeg frame")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One decoded RGB8 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Pulls frames off a byte stream.
pub struct FrameReader<R> {
    inner: R,
    codec: FrameCodec,
    width: u32,
    height: u32,
    max_payload: usize,
}

impl<R: Read> FrameReader<R> {
    /// `width` and `height` size raw frames; JPEG frames carry their own.
    pub fn new(inner: R, codec: FrameCodec, width: u32, height: u32) -> Self {
        Self {
            inner,
            codec,
            width,
            height,
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Reads the next frame. `Ok(None)` means the sender closed the
    /// stream cleanly between frames.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, StreamError> {
        match self.codec {
            FrameCodec::Raw => self.next_raw(),
            FrameCodec::Jpeg => self.next_jpeg(),
        }
    }

    fn next_raw(&mut self) -> Result<Option<Frame>, StreamError> {
        let mut data = vec![0; self.width as usize * self.height as usize * 3];
        if !read_frame_part(&mut self.inner, &mut data, true)? {
            return Ok(None);
        }
        Ok(Some(Frame {
            width: self.width,
            height: self.height,
            data,
        }))
    }

    fn next_jpeg(&mut self) -> Result<Option<Frame>, StreamError> {
        let mut prefix = [0u8; 4];
        if !read_frame_part(&mut self.inner, &mut prefix, true)? {
            return Ok(None);
        }

        let size = u32::from_be_bytes(prefix) as usize;
        if size > self.max_payload {
            return Err(StreamError::Oversized {
                size,
                max: self.max_payload,
            });
        }

        let mut payload = vec![0; size];
        read_frame_part(&mut self.inner, &mut payload, false)?;

        let image = image::load_from_memory_with_format(&payload, ImageFormat::Jpeg)?.to_rgb8();
        Ok(Some(Frame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        }))
    }
}

/// Fills `buf` completely.
///
/// Returns `Ok(false)` when the stream is already at its end and
/// `eof_ok` is set; running out part-way is always [`StreamError::Truncated`].
fn read_frame_part<R: Read>(reader: &mut R, buf: &mut [u8], eof_ok: bool) -> Result<bool, StreamError> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) if read == 0 && eof_ok => return Ok(false),
            Ok(0) => {
                return Err(StreamError::Truncated {
                    read,
                    expected: buf.len(),
                })
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 95)
            .encode(&pixels, width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    // ── raw ───────────────────────────────────────────────────────────────

    #[test]
    fn raw_frames_then_clean_end() {
        let mut bytes = vec![1u8; 2 * 2 * 3];
        bytes.extend(vec![2u8; 2 * 2 * 3]);
        let mut reader = FrameReader::new(Cursor::new(bytes), FrameCodec::Raw, 2, 2);

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!((first.width, first.height), (2, 2));
        assert!(first.data.iter().all(|&b| b == 1));

        let second = reader.next_frame().unwrap().unwrap();
        assert!(second.data.iter().all(|&b| b == 2));

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn raw_partial_frame_is_truncation() {
        let bytes = vec![0u8; 2 * 2 * 3 - 1];
        let mut reader = FrameReader::new(Cursor::new(bytes), FrameCodec::Raw, 2, 2);
        assert!(matches!(
            reader.next_frame(),
            Err(StreamError::Truncated { read: 11, expected: 12 })
        ));
    }

    // ── jpeg ──────────────────────────────────────────────────────────────

    #[test]
    fn jpeg_frame_decodes_to_rgb() {
        let bytes = framed(&encode_jpeg(16, 8, [200, 30, 30]));
        let mut reader = FrameReader::new(Cursor::new(bytes), FrameCodec::Jpeg, 0, 0);

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (16, 8));
        assert_eq!(frame.data.len(), 16 * 8 * 3);
        // lossy, but a flat colour survives closely
        let px = &frame.data[..3];
        assert!(px[0] > 180 && px[1] < 60 && px[2] < 60, "{px:?}");

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn jpeg_truncated_payload() {
        let mut bytes = framed(&encode_jpeg(8, 8, [0, 0, 0]));
        bytes.truncate(bytes.len() - 10);
        let mut reader = FrameReader::new(Cursor::new(bytes), FrameCodec::Jpeg, 0, 0);
        assert!(matches!(reader.next_frame(), Err(StreamError::Truncated { .. })));
    }

    #[test]
    fn jpeg_truncated_prefix() {
        let mut reader = FrameReader::new(Cursor::new(vec![0u8, 0]), FrameCodec::Jpeg, 0, 0);
        assert!(matches!(
            reader.next_frame(),
            Err(StreamError::Truncated { read: 2, expected: 4 })
        ));
    }

    #[test]
    fn jpeg_oversized_payload_is_rejected_before_reading() {
        let bytes = 1_000_000u32.to_be_bytes().to_vec();
        let mut reader =
            FrameReader::new(Cursor::new(bytes), FrameCodec::Jpeg, 0, 0).with_max_payload(1024);
        assert!(matches!(
            reader.next_frame(),
            Err(StreamError::Oversized { size: 1_000_000, max: 1024 })
        ));
    }

    #[test]
    fn jpeg_garbage_is_decode_error() {
        let bytes = framed(b"definitely not a jpeg");
        let mut reader = FrameReader::new(Cursor::new(bytes), FrameCodec::Jpeg, 0, 0);
        assert!(matches!(reader.next_frame(), Err(StreamError::Decode(_))));
    }
}
