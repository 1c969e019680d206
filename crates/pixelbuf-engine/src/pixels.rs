//! CPU-side pixel storage.

use bytemuck::{Pod, Zeroable};

/// One RGB pixel, one byte per channel.
///
/// `#[repr(C)]` with no padding, so a `[Rgb]` slice has exactly the byte
/// layout of a `(height, width, 3)` `u8` array.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA texel for the GPU texture.
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, u8::MAX]
    }
}

/// Row-major pixel buffer owned by a framebuffer.
///
/// Invariant: `pixels.len() == width * height`. The buffer is only ever
/// replaced wholesale; there is no partial update path.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Allocates a black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Size of the buffer in bytes (`width * height * 3`).
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Rgb>()
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Flat index of `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Overwrites every pixel from raw bytes.
    ///
    /// The caller has already checked `bytes.len() == self.byte_len()`; the
    /// binding layer reports a mismatch as an error before getting here.
    pub(crate) fn copy_from_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.pixels.len(), self.width * self.height);
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut self.pixels);
        dst.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.byte_len(), 18);
        assert!(buf.pixels().iter().all(|p| *p == Rgb::BLACK));
    }

    #[test]
    fn offset_is_row_major() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.offset(0, 0), Some(0));
        assert_eq!(buf.offset(3, 0), Some(3));
        assert_eq!(buf.offset(0, 1), Some(4));
        assert_eq!(buf.offset(2, 2), Some(10));
    }

    #[test]
    fn offset_out_of_bounds() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.offset(4, 0), None);
        assert_eq!(buf.offset(0, 3), None);
    }

    #[test]
    fn copy_keeps_bytes_verbatim() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.copy_from_bytes(&[1, 2, 3, 250, 251, 252]);
        assert_eq!(buf.get(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(buf.get(1, 0), Some(Rgb::new(250, 251, 252)));
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 250, 251, 252]);
    }
}
