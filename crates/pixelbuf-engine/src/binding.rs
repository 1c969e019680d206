//! Host array marshalling.
//!
//! A scripting host hands over pixels as an n-dimensional array: a byte
//! slice, a shape and an element type. [`PixelArray`] carries exactly that,
//! and [`PixelArray::validate`] checks it against a framebuffer before any
//! byte is copied. Validation runs in every build profile.
//!
//! Arrays are assumed C-contiguous (row-major, no stride gaps). Hosts with
//! strided arrays must make a contiguous copy first.

use thiserror::Error;

use crate::pixels::PixelBuffer;

/// Element type of a host array.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::I8 => "int8",
            Self::U16 => "uint16",
            Self::I16 => "int16",
            Self::U32 => "uint32",
            Self::I32 => "int32",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejected pixel upload.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PixelError {
    /// Not a `(height, width, 3)` array of `uint8`.
    #[error("expected an array of shape (height, width, 3) with dtype uint8, got shape {shape:?} with dtype {element}")]
    Shape {
        shape: Vec<usize>,
        element: ElementType,
    },

    /// Well-formed array whose size differs from the framebuffer.
    #[error("array dimensions {actual_width}x{actual_height} do not match framebuffer dimensions {expected_width}x{expected_height}")]
    Dimensions {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// Declared shape and supplied bytes disagree.
    #[error("array holds {actual} bytes but its shape requires {expected}")]
    Length { expected: usize, actual: usize },
}

/// Borrowed view of a host-owned pixel array.
#[derive(Debug, Clone)]
pub struct PixelArray<'a> {
    data: &'a [u8],
    shape: Vec<usize>,
    element: ElementType,
}

impl<'a> PixelArray<'a> {
    /// Wraps raw host data. Nothing is checked until [`validate`](Self::validate).
    pub fn new(data: &'a [u8], shape: impl Into<Vec<usize>>, element: ElementType) -> Self {
        Self {
            data,
            shape: shape.into(),
            element,
        }
    }

    /// Shorthand for a `(height, width, 3)` `uint8` array.
    pub fn rgb8(data: &'a [u8], width: usize, height: usize) -> Self {
        Self::new(data, [height, width, 3], ElementType::U8)
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Checks the array against a `width` x `height` target.
    ///
    /// Checks run in a fixed order: shape and dtype, then dimensions, then
    /// byte length. The first failing check is reported.
    pub fn validate(&self, width: usize, height: usize) -> Result<(), PixelError> {
        let &[rows, cols, channels] = self.shape.as_slice() else {
            return Err(self.shape_error());
        };
        if channels != 3 || self.element != ElementType::U8 {
            return Err(self.shape_error());
        }

        if cols != width || rows != height {
            return Err(PixelError::Dimensions {
                expected_width: width,
                expected_height: height,
                actual_width: cols,
                actual_height: rows,
            });
        }

        let expected = rows * cols * channels * self.element.size();
        if self.data.len() != expected {
            return Err(PixelError::Length {
                expected,
                actual: self.data.len(),
            });
        }

        Ok(())
    }

    /// Validates and copies into `target`, replacing all of its pixels.
    pub fn copy_into(&self, target: &mut PixelBuffer) -> Result<(), PixelError> {
        self.validate(target.width(), target.height())?;
        target.copy_from_bytes(self.data);
        Ok(())
    }

    fn shape_error(&self) -> PixelError {
        PixelError::Shape {
            shape: self.shape.clone(),
            element: self.element,
        }
    }
}
